use serde::{Deserialize, Serialize};

/// Identifier wrapper for leads captured from ad-form submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// A sales inquiry captured from an ad campaign, tracked through a status
/// pipeline toward a booked job or disqualification.
///
/// Leads are immutable snapshots here: the backend owns the lifecycle, this
/// service only derives display values from what it is handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub service: String,
    pub ad_set_name: String,
    pub ad_name: String,
    /// ISO date (`YYYY-MM-DD`) of the ad-form submission.
    pub lead_date: String,
    pub zip: String,
    pub status: LeadStatus,
    #[serde(default)]
    pub estimate_set: bool,
    #[serde(default)]
    pub unqualified_lead_reason: Option<String>,
    #[serde(default)]
    pub proposal_amount: Option<f64>,
    #[serde(default)]
    pub job_booked_amount: Option<f64>,
}

/// Pipeline status for a lead.
///
/// The backend's status vocabulary can run ahead of this list, so unknown wire
/// values land in an explicit `Other` variant instead of failing
/// deserialization. Every method on this enum is total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    New,
    InProgress,
    EstimateSet,
    VirtualQuote,
    EstimateCanceled,
    ProposalPresented,
    JobBooked,
    JobLost,
    Unqualified,
    Other(String),
}

/// Display tuple backing the status chips in the leads table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: &'static str,
}

impl LeadStatus {
    pub const KNOWN: [LeadStatus; 9] = [
        LeadStatus::New,
        LeadStatus::InProgress,
        LeadStatus::EstimateSet,
        LeadStatus::VirtualQuote,
        LeadStatus::EstimateCanceled,
        LeadStatus::ProposalPresented,
        LeadStatus::JobBooked,
        LeadStatus::JobLost,
        LeadStatus::Unqualified,
    ];

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "new" => Self::New,
            "in_progress" => Self::InProgress,
            "estimate_set" => Self::EstimateSet,
            "virtual_quote" => Self::VirtualQuote,
            "estimate_canceled" => Self::EstimateCanceled,
            "proposal_presented" => Self::ProposalPresented,
            "job_booked" => Self::JobBooked,
            "job_lost" => Self::JobLost,
            "unqualified" => Self::Unqualified,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::EstimateSet => "estimate_set",
            Self::VirtualQuote => "virtual_quote",
            Self::EstimateCanceled => "estimate_canceled",
            Self::ProposalPresented => "proposal_presented",
            Self::JobBooked => "job_booked",
            Self::JobLost => "job_lost",
            Self::Unqualified => "unqualified",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Label and color for the status chip. Unknown statuses render the
    /// generic gray fallback rather than failing.
    pub fn badge(&self) -> StatusBadge {
        match self {
            Self::New => StatusBadge {
                label: "New",
                color: "blue",
            },
            Self::InProgress => StatusBadge {
                label: "In Progress",
                color: "amber",
            },
            Self::EstimateSet => StatusBadge {
                label: "Estimate Set",
                color: "teal",
            },
            Self::VirtualQuote => StatusBadge {
                label: "Virtual Quote",
                color: "purple",
            },
            Self::EstimateCanceled => StatusBadge {
                label: "Estimate Canceled",
                color: "orange",
            },
            Self::ProposalPresented => StatusBadge {
                label: "Proposal Presented",
                color: "indigo",
            },
            Self::JobBooked => StatusBadge {
                label: "Job Booked",
                color: "green",
            },
            Self::JobLost => StatusBadge {
                label: "Job Lost",
                color: "red",
            },
            Self::Unqualified => StatusBadge {
                label: "Unqualified",
                color: "slate",
            },
            Self::Other(_) => StatusBadge {
                label: "Unknown",
                color: "gray",
            },
        }
    }

    /// A proposal amount may only accompany statuses where a quote has been
    /// presented or scheduled.
    pub fn can_set_proposal_amount(&self) -> bool {
        matches!(
            self,
            Self::EstimateSet | Self::VirtualQuote | Self::ProposalPresented | Self::JobLost
        )
    }

    /// A booked amount is only meaningful once the job is actually booked.
    pub fn can_set_job_booked_amount(&self) -> bool {
        matches!(self, Self::JobBooked)
    }
}

impl From<String> for LeadStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<LeadStatus> for String {
    fn from(value: LeadStatus) -> Self {
        value.as_wire().to_string()
    }
}

/// Wire shape of `GET /leads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadsEnvelope {
    pub leads: Vec<Lead>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_gets_generic_badge() {
        let status = LeadStatus::parse("frobnicated");
        assert_eq!(status, LeadStatus::Other("frobnicated".to_string()));
        let badge = status.badge();
        assert_eq!(badge.label, "Unknown");
        assert_eq!(badge.color, "gray");
    }

    #[test]
    fn proposal_statuses_match_business_rule() {
        for status in [
            LeadStatus::EstimateSet,
            LeadStatus::VirtualQuote,
            LeadStatus::ProposalPresented,
            LeadStatus::JobLost,
        ] {
            assert!(status.can_set_proposal_amount(), "{:?}", status);
        }
        assert!(!LeadStatus::JobBooked.can_set_proposal_amount());
        assert!(!LeadStatus::New.can_set_proposal_amount());
    }

    #[test]
    fn amount_predicates_are_mutually_exclusive() {
        let mut all: Vec<LeadStatus> = LeadStatus::KNOWN.to_vec();
        all.push(LeadStatus::Other("mystery".to_string()));
        for status in all {
            assert!(
                !(status.can_set_proposal_amount() && status.can_set_job_booked_amount()),
                "{:?} allows both amounts",
                status
            );
        }
        assert!(LeadStatus::JobBooked.can_set_job_booked_amount());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let parsed: LeadStatus = serde_json::from_str("\"job_booked\"").expect("parses");
        assert_eq!(parsed, LeadStatus::JobBooked);
        assert_eq!(
            serde_json::to_string(&parsed).expect("serializes"),
            "\"job_booked\""
        );

        let unknown: LeadStatus = serde_json::from_str("\"callback_later\"").expect("parses");
        assert_eq!(unknown.as_wire(), "callback_later");
    }

    #[test]
    fn lead_deserializes_from_backend_shape() {
        let json = r#"{
            "id": "lead-778",
            "name": "Dana Whitfield",
            "email": "dana@example.com",
            "service": "Gutter Install",
            "adSetName": "Des Moines Metro",
            "adName": "Fall Promo A",
            "leadDate": "2026-08-12",
            "zip": "50310",
            "status": "estimate_set",
            "estimateSet": true,
            "proposalAmount": 4250.0
        }"#;

        let lead: Lead = serde_json::from_str(json).expect("lead parses");
        assert_eq!(lead.status, LeadStatus::EstimateSet);
        assert!(lead.status.can_set_proposal_amount());
        assert_eq!(lead.proposal_amount, Some(4250.0));
        assert_eq!(lead.phone, None);
    }
}
