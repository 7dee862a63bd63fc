//! Internal support intake mirrors: tickets and feature requests fetched from
//! the backend, with display formatting only. No derived logic lives here
//! beyond labels and colors.

use serde::{Deserialize, Serialize};

use crate::workflows::leads::StatusBadge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Ticket workflow status; unknown wire values land in `Other` so a backend
/// vocabulary change never breaks the support pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Other(String),
}

impl TicketStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            "closed" => Self::Closed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            Self::Open => StatusBadge {
                label: "Open",
                color: "blue",
            },
            Self::InProgress => StatusBadge {
                label: "In Progress",
                color: "amber",
            },
            Self::Resolved => StatusBadge {
                label: "Resolved",
                color: "green",
            },
            Self::Closed => StatusBadge {
                label: "Closed",
                color: "slate",
            },
            Self::Other(_) => StatusBadge {
                label: "Unknown",
                color: "gray",
            },
        }
    }
}

impl From<String> for TicketStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TicketStatus> for String {
    fn from(value: TicketStatus) -> Self {
        value.as_wire().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
    Other(String),
}

impl TicketPriority {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            Self::Low => StatusBadge {
                label: "Low",
                color: "slate",
            },
            Self::Medium => StatusBadge {
                label: "Medium",
                color: "blue",
            },
            Self::High => StatusBadge {
                label: "High",
                color: "orange",
            },
            Self::Urgent => StatusBadge {
                label: "Urgent",
                color: "red",
            },
            Self::Other(_) => StatusBadge {
                label: "Unknown",
                color: "gray",
            },
        }
    }
}

impl From<String> for TicketPriority {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TicketPriority> for String {
    fn from(value: TicketPriority) -> Self {
        value.as_wire().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_deserializes_with_unknown_status() {
        let json = r#"{
            "id": "tick-7",
            "title": "Dashboard timeout",
            "description": "Leads page spins on large date ranges",
            "status": "awaiting_triage",
            "priority": "high",
            "createdAt": "2026-08-29T18:04:00Z",
            "updatedAt": "2026-08-30T09:12:00Z"
        }"#;

        let ticket: Ticket = serde_json::from_str(json).expect("ticket parses");
        assert_eq!(ticket.status, TicketStatus::Other("awaiting_triage".into()));
        assert_eq!(ticket.status.badge().label, "Unknown");
        assert_eq!(
            ticket.priority.expect("priority present").badge().color,
            "orange"
        );
    }

    #[test]
    fn known_statuses_have_distinct_labels() {
        let labels: Vec<&str> = [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ]
        .iter()
        .map(|status| status.badge().label)
        .collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels, deduped);
    }
}
