//! Lead pipeline: domain records, conversion-rate lookup, scoring, and the
//! CSV export surface, plus the HTTP routes that expose them.

pub mod domain;
pub mod export;
pub mod rates;
pub mod router;
pub mod scoring;
pub mod service;

pub use domain::{Lead, LeadId, LeadStatus, LeadsEnvelope, StatusBadge};
pub use export::{CsvExport, ExportScope};
pub use rates::{ConversionRate, ConversionRatesEnvelope, RateBook, RateKeyField};
pub use router::lead_router;
pub use scoring::{LeadScoringEngine, ScoreWeights, NEUTRAL_SCORE};
pub use service::{LeadReport, LeadReportingService, LeadView};
