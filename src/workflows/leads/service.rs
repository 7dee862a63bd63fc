use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;

use super::domain::{Lead, LeadsEnvelope};
use super::export::{self, CsvExport, ExportError, ExportScope};
use super::rates::{ConversionRatesEnvelope, RateBook};
use super::scoring::{LeadScoringEngine, ScoreWeights};
use crate::workflows::timeframe::{self, DateRange, TimeFilter};

/// Display row for the leads table: the lead's attributes plus every derived
/// value the dashboard renders (score, status chip).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadView {
    pub id: String,
    pub name: String,
    pub service: String,
    pub ad_set_name: String,
    pub ad_name: String,
    pub lead_date: String,
    pub zip: String,
    pub status: String,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub score: u8,
    pub estimate_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_booked_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unqualified_lead_reason: Option<String>,
}

impl LeadView {
    fn from_lead(lead: &Lead, score: u8) -> Self {
        let badge = lead.status.badge();
        Self {
            id: lead.id.0.clone(),
            name: lead.name.clone(),
            service: lead.service.clone(),
            ad_set_name: lead.ad_set_name.clone(),
            ad_name: lead.ad_name.clone(),
            lead_date: lead.lead_date.clone(),
            zip: lead.zip.clone(),
            status: lead.status.as_wire().to_string(),
            status_label: badge.label,
            status_color: badge.color,
            score,
            estimate_set: lead.estimate_set,
            proposal_amount: lead.proposal_amount,
            job_booked_amount: lead.job_booked_amount,
            unqualified_lead_reason: lead.unqualified_lead_reason.clone(),
        }
    }
}

/// Report over one reporting window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadReport {
    pub range: DateRange,
    /// Backend-reported total before date filtering.
    pub backend_total: u64,
    /// Leads inside the resolved window.
    pub matched: usize,
    pub rows: Vec<LeadView>,
}

/// Facade composing date-range resolution, scoring, and CSV export over
/// fully materialized inputs. Holds no fetched state; callers pass in what
/// the backend returned.
#[derive(Debug, Clone, Default)]
pub struct LeadReportingService {
    engine: LeadScoringEngine,
}

impl LeadReportingService {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            engine: LeadScoringEngine::new(weights),
        }
    }

    /// Score every lead inside the resolved window and shape it for display.
    pub fn report<Tz: TimeZone>(
        &self,
        leads: &LeadsEnvelope,
        rates: &ConversionRatesEnvelope,
        filter: &TimeFilter,
        now: &DateTime<Tz>,
    ) -> LeadReport {
        let range = timeframe::resolve(filter, now);
        let book = RateBook::from_envelope(rates);
        let tz = now.timezone();

        let rows: Vec<LeadView> = leads
            .leads
            .iter()
            .filter(|lead| lead_in_range(lead, &range, &tz))
            .map(|lead| LeadView::from_lead(lead, self.engine.score(lead, &book)))
            .collect();

        LeadReport {
            range,
            backend_total: leads.total,
            matched: rows.len(),
            rows,
        }
    }

    /// Render the current view to a downloadable CSV.
    pub fn export<Tz: TimeZone>(
        &self,
        leads: &LeadsEnvelope,
        rates: &ConversionRatesEnvelope,
        filter: &TimeFilter,
        scope: ExportScope,
        now: &DateTime<Tz>,
    ) -> Result<CsvExport, ExportError> {
        let range = timeframe::resolve(filter, now);
        let book = RateBook::from_envelope(rates);
        let tz = now.timezone();
        let filtered: Vec<Lead> = leads
            .leads
            .iter()
            .filter(|lead| lead_in_range(lead, &range, &tz))
            .cloned()
            .collect();

        export::build_export(&filtered, &self.engine, &book, scope, now.naive_local())
    }
}

/// Day-granular window test. Unbounded ranges admit everything; a bounded
/// range excludes leads whose date cannot be parsed.
///
/// Bounds are rendered as UTC instants but describe local calendar days, so
/// they are read back through the resolving timezone before comparing.
fn lead_in_range<Tz: TimeZone>(lead: &Lead, range: &DateRange, tz: &Tz) -> bool {
    if range.is_unbounded() {
        return true;
    }

    let Some(day) = parse_lead_day(&lead.lead_date) else {
        return false;
    };

    if let Some(start) = parse_bound(&range.start_date, tz) {
        if day < start {
            return false;
        }
    }
    if let Some(end) = parse_bound(&range.end_date, tz) {
        if day > end {
            return false;
        }
    }
    true
}

fn parse_lead_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_bound<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::leads::domain::{LeadId, LeadStatus};
    use chrono::Utc;

    fn lead_on(id: &str, date: &str) -> Lead {
        Lead {
            id: LeadId(id.to_string()),
            name: format!("Lead {id}"),
            email: None,
            phone: None,
            service: "Roofing".to_string(),
            ad_set_name: "Des Moines Metro".to_string(),
            ad_name: "Fall Promo A".to_string(),
            lead_date: date.to_string(),
            zip: "50310".to_string(),
            status: LeadStatus::New,
            estimate_set: false,
            unqualified_lead_reason: None,
            proposal_amount: None,
            job_booked_amount: None,
        }
    }

    fn envelope(leads: Vec<Lead>) -> LeadsEnvelope {
        let total = leads.len() as u64;
        LeadsEnvelope { leads, total }
    }

    fn no_rates() -> ConversionRatesEnvelope {
        ConversionRatesEnvelope {
            success: true,
            data: Vec::new(),
        }
    }

    fn clock() -> DateTime<Utc> {
        chrono::NaiveDate::from_ymd_opt(2026, 8, 30)
            .expect("valid date")
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
            .and_utc()
    }

    #[test]
    fn report_keeps_all_leads_for_unbounded_filter() {
        let service = LeadReportingService::default();
        let leads = envelope(vec![
            lead_on("a", "2026-08-03"),
            lead_on("b", "2019-01-01"),
            lead_on("c", "not-a-date"),
        ]);

        let report = service.report(&leads, &no_rates(), &TimeFilter::All, &clock());
        assert_eq!(report.matched, 3);
        assert!(report.range.is_unbounded());
        assert!(report.rows.iter().all(|row| row.score == 50));
    }

    #[test]
    fn report_filters_to_the_resolved_month() {
        let service = LeadReportingService::default();
        let leads = envelope(vec![
            lead_on("in-window", "2026-08-03"),
            lead_on("before", "2026-07-31"),
            lead_on("after", "2026-09-01"),
            lead_on("garbled", "soon"),
        ]);

        let report = service.report(&leads, &no_rates(), &TimeFilter::ThisMonth, &clock());
        assert_eq!(report.matched, 1);
        assert_eq!(report.rows[0].id, "in-window");
        assert_eq!(report.backend_total, 4);
    }

    #[test]
    fn window_boundaries_follow_the_resolving_timezone() {
        use chrono::{FixedOffset, TimeZone as _};

        let service = LeadReportingService::default();
        let leads = envelope(vec![
            lead_on("july", "2026-07-31"),
            lead_on("august", "2026-08-01"),
        ]);

        // At UTC+2 the August start bound renders as 2026-07-31T22:00:00Z;
        // the July 31 lead must still fall outside the month.
        let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let now = offset
            .with_ymd_and_hms(2026, 8, 15, 12, 0, 0)
            .single()
            .expect("valid local time");

        let report = service.report(&leads, &no_rates(), &TimeFilter::ThisMonth, &now);
        assert_eq!(report.matched, 1);
        assert_eq!(report.rows[0].id, "august");
    }

    #[test]
    fn report_includes_boundary_days() {
        let service = LeadReportingService::default();
        let leads = envelope(vec![
            lead_on("first", "2026-08-01"),
            lead_on("last", "2026-08-31"),
        ]);

        let report = service.report(&leads, &no_rates(), &TimeFilter::ThisMonth, &clock());
        assert_eq!(report.matched, 2);
    }

    #[test]
    fn views_carry_status_presentation() {
        let service = LeadReportingService::default();
        let mut booked = lead_on("won", "2026-08-10");
        booked.status = LeadStatus::JobBooked;
        booked.job_booked_amount = Some(12_500.0);

        let report = service.report(
            &envelope(vec![booked]),
            &no_rates(),
            &TimeFilter::All,
            &clock(),
        );
        let row = &report.rows[0];
        assert_eq!(row.status, "job_booked");
        assert_eq!(row.status_label, "Job Booked");
        assert_eq!(row.status_color, "green");
        assert_eq!(row.job_booked_amount, Some(12_500.0));
    }

    #[test]
    fn export_applies_the_same_window() {
        let service = LeadReportingService::default();
        let leads = envelope(vec![
            lead_on("kept", "2026-08-03"),
            lead_on("dropped", "2025-02-01"),
        ]);

        let export = service
            .export(
                &leads,
                &no_rates(),
                &TimeFilter::ThisMonth,
                ExportScope::AllFiltered,
                &clock(),
            )
            .expect("export renders");

        assert!(export.filename.starts_with("leads_all_filtered_"));
        assert_eq!(export.content_type, "text/csv;charset=utf-8;");
        assert!(export.body.contains("Lead kept"));
        assert!(!export.body.contains("Lead dropped"));
    }
}
