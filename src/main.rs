use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use leadops::config::AppConfig;
use leadops::error::AppError;
use leadops::telemetry;
use leadops::workflows::leads::{
    lead_router, ConversionRatesEnvelope, ExportScope, LeadReportingService, LeadsEnvelope,
};
use leadops::workflows::timeframe::TimeFilter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Marketing Ops Console",
    about = "Run the marketing operations reporting service or export leads from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Lead reporting utilities
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    /// Score a fetched lead collection and write it out as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// JSON file holding the `{ "leads": [...], "total": n }` envelope
    #[arg(long)]
    leads: PathBuf,
    /// JSON file holding the `{ "success": true, "data": [...] }` rate envelope
    #[arg(long)]
    rates: Option<PathBuf>,
    /// Symbolic time filter applied before export (e.g. this_month, last_quarter)
    #[arg(long, default_value = "all")]
    time_filter: String,
    /// Which slice the export represents; only affects the filename
    #[arg(long, value_enum, default_value_t = ScopeArg::AllFiltered)]
    scope: ScopeArg,
    /// Output path; defaults to the conventional filename in the working directory
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    CurrentPage,
    AllFiltered,
}

impl From<ScopeArg> for ExportScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::CurrentPage => ExportScope::CurrentPage,
            ScopeArg::AllFiltered => ExportScope::AllFiltered,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Leads {
            command: LeadsCommand::Export(args),
        } => run_leads_export(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let service = Arc::new(LeadReportingService::default());
    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(lead_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketing ops reporting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_leads_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        leads,
        rates,
        time_filter,
        scope,
        output,
    } = args;

    let leads: LeadsEnvelope = serde_json::from_str(&std::fs::read_to_string(leads)?)?;
    let rates: ConversionRatesEnvelope = match rates {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ConversionRatesEnvelope {
            success: false,
            data: Vec::new(),
        },
    };

    let filter = TimeFilter::parse(&time_filter);
    let service = LeadReportingService::default();
    let export = service.export(&leads, &rates, &filter, scope.into(), &Local::now())?;

    let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));
    std::fs::write(&path, export.body.as_bytes())?;

    println!("Lead export written");
    println!("Filter: {}", filter.as_wire());
    println!("Leads in file: {}", leads.total);
    println!("Output: {}", path.display());

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
