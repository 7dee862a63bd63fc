use chrono::NaiveDateTime;

use super::domain::Lead;
use super::rates::RateBook;
use super::scoring::LeadScoringEngine;

/// Content type the browser download handler expects for lead exports.
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8;";

/// Fixed export header; column order is part of the contract with the
/// spreadsheet templates the sales team uses downstream.
pub const CSV_HEADER: [&str; 11] = [
    "Lead Name",
    "Email",
    "Phone",
    "Service",
    "ZIP Code",
    "Lead Date",
    "Ad Set Name",
    "Ad Name",
    "Lead Status",
    "Lead Score",
    "Unqualified Reason",
];

/// Which slice of the dashboard the export covers; only affects the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    CurrentPage,
    AllFiltered,
}

impl ExportScope {
    fn slug(self) -> &'static str {
        match self {
            Self::CurrentPage => "current_page",
            Self::AllFiltered => "all_filtered",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A rendered export ready to hand to the download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// `leads_current_page_<ts>.csv` / `leads_all_filtered_<ts>.csv`.
pub fn export_filename(scope: ExportScope, at: NaiveDateTime) -> String {
    format!(
        "leads_{}_{}.csv",
        scope.slug(),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Serialize the leads to CSV text, scoring each row against the supplied
/// rate table. Fields containing commas or double quotes are quoted with
/// embedded quotes doubled (the `csv` writer's necessary-quoting default).
pub fn render_csv(
    leads: &[Lead],
    engine: &LeadScoringEngine,
    rates: &RateBook,
) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for lead in leads {
        let score = engine.score(lead, rates);
        writer.write_record([
            lead.name.as_str(),
            lead.email.as_deref().unwrap_or(""),
            lead.phone.as_deref().unwrap_or(""),
            lead.service.as_str(),
            lead.zip.as_str(),
            lead.lead_date.as_str(),
            lead.ad_set_name.as_str(),
            lead.ad_name.as_str(),
            lead.status.badge().label,
            score.to_string().as_str(),
            lead.unqualified_lead_reason.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render and package an export with its filename and content type.
pub fn build_export(
    leads: &[Lead],
    engine: &LeadScoringEngine,
    rates: &RateBook,
    scope: ExportScope,
    at: NaiveDateTime,
) -> Result<CsvExport, ExportError> {
    Ok(CsvExport {
        filename: export_filename(scope, at),
        content_type: CSV_CONTENT_TYPE,
        body: render_csv(leads, engine, rates)?,
    })
}
