//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::tickers;
use crate::error::{RequestContext, SignalError, SignalErrorKind};
use crate::metrics::Metrics;
use crate::models::market::{AssetClass, Interval};
use crate::models::signal::SignalResult;
use crate::signals::{SignalEngine, SignalRequest};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SignalEngine>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

impl AppState {
    pub fn new(engine: Arc<SignalEngine>, metrics: Arc<Metrics>) -> Self {
        Self {
            engine,
            metrics,
            start_time: Arc::new(Instant::now()),
        }
    }
}

impl SignalErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SignalErrorKind::InvalidPeriodInterval { .. }
            | SignalErrorKind::UnsupportedAssetClass(_)
            | SignalErrorKind::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            SignalErrorKind::DataUnavailable(_) | SignalErrorKind::SchemaError(_) => {
                StatusCode::BAD_GATEWAY
            }
            SignalErrorKind::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for SignalError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let body = Json(json!({
            "error": self.kind.to_string(),
            "kind": self.kind.label(),
            "context": self.context,
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": "tasignal-api"
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct SignalQuery {
    pub symbol: String,
    pub asset_class: String,
    pub period: Option<String>,
    pub interval: Option<String>,
    pub indicators: Option<String>,
    pub rsi_length: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SignalResponse {
    #[serde(flatten)]
    result: SignalResult,
    report: String,
}

async fn get_signal(
    State(state): State<AppState>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<SignalResponse>, SignalError> {
    let mut request = SignalRequest::parse(
        &params.symbol,
        &params.asset_class,
        params.period.as_deref(),
        params.interval.as_deref(),
        params.indicators.as_deref(),
    )?;
    if let Some(length) = params.rsi_length {
        request = request.with_rsi_length(length);
    }

    let result = state.engine.compute_signal(&request).await?;
    let report = result.report();
    Ok(Json(SignalResponse { result, report }))
}

#[derive(Debug, Deserialize)]
pub struct TickerQuery {
    pub asset_class: Option<String>,
}

#[derive(Debug, Serialize)]
struct TickerEntry {
    label: &'static str,
    symbol: &'static str,
}

fn ticker_entries(asset_class: AssetClass) -> Vec<TickerEntry> {
    tickers::catalogue(asset_class)
        .iter()
        .map(|&(label, symbol)| TickerEntry { label, symbol })
        .collect()
}

/// Ticker catalogue for one asset class, or all of them when none is given.
async fn list_tickers(Query(params): Query<TickerQuery>) -> Result<Json<Value>, SignalError> {
    match params.asset_class {
        Some(raw) => {
            let asset_class: AssetClass = raw.parse().map_err(|kind: SignalErrorKind| {
                kind.with_context(RequestContext {
                    asset_class: raw.clone(),
                    ..Default::default()
                })
            })?;
            Ok(Json(json!({
                "asset_class": asset_class,
                "tickers": ticker_entries(asset_class),
            })))
        }
        None => {
            let all: serde_json::Map<String, Value> = AssetClass::ALL
                .iter()
                .map(|ac| (ac.to_string(), json!(ticker_entries(*ac))))
                .collect();
            Ok(Json(Value::Object(all)))
        }
    }
}

/// Bar intervals with the lookback periods each accepts.
async fn list_windows() -> Json<Value> {
    let windows: Vec<Value> = Interval::ALL
        .iter()
        .map(|interval| json!({ "interval": interval, "periods": interval.allowed_periods() }))
        .collect();
    Json(json!(windows))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signal", get(get_signal))
        .route("/api/tickers", get(list_tickers))
        .route("/api/windows", get(list_windows))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
