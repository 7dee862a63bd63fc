use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;

use super::domain::LeadsEnvelope;
use super::export::ExportScope;
use super::rates::ConversionRatesEnvelope;
use super::service::LeadReportingService;
use crate::error::AppError;
use crate::workflows::timeframe::TimeFilter;

/// Router builder exposing the lead report and export endpoints.
pub fn lead_router(service: Arc<LeadReportingService>) -> Router {
    Router::new()
        .route("/api/v1/leads/report", post(report_handler))
        .route("/api/v1/leads/export", post(export_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeadReportRequest {
    #[serde(default)]
    pub(crate) time_filter: TimeFilter,
    pub(crate) leads: LeadsEnvelope,
    pub(crate) conversion_rates: ConversionRatesEnvelope,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeadExportRequest {
    #[serde(default)]
    pub(crate) time_filter: TimeFilter,
    pub(crate) scope: ExportScope,
    pub(crate) leads: LeadsEnvelope,
    pub(crate) conversion_rates: ConversionRatesEnvelope,
}

pub(crate) async fn report_handler(
    State(service): State<Arc<LeadReportingService>>,
    Json(payload): Json<LeadReportRequest>,
) -> Response {
    let report = service.report(
        &payload.leads,
        &payload.conversion_rates,
        &payload.time_filter,
        &Local::now(),
    );
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn export_handler(
    State(service): State<Arc<LeadReportingService>>,
    Json(payload): Json<LeadExportRequest>,
) -> Result<Response, AppError> {
    let export = service.export(
        &payload.leads,
        &payload.conversion_rates,
        &payload.time_filter,
        payload.scope,
        &Local::now(),
    )?;

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}
