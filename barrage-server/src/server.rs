use crate::payload::{bearer_headers, CompletionPayload};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use barrage::RunError;
use barrage_core::{Report, RunConfig};
use serde::Deserialize;
use serde_json::json;
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
#[allow(unused)]
use tracing::{debug, error, info, instrument};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The benchmark API router. Kept separate from [`server_task`] so tests can
/// serve it on an ephemeral port.
pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/benchmark", post(benchmark))
        .route("/fireworks_benchmark", post(fireworks_benchmark))
}

pub async fn server_task(port: u16) -> Result<(), ServerError> {
    let app = app().layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let socket_addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(socket_addr).await?;

    info!("benchmark API listening on {socket_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Error, Debug)]
enum HandlerError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Run(#[from] RunError),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        use HandlerError::*;
        match self {
            Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            Run(RunError::Config(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Run(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("engine error: {err}"),
            ),
        }
        .into_response()
    }
}

fn invalid(msg: &str) -> HandlerError {
    HandlerError::Invalid(msg.to_string())
}

fn validate_job(qps: u32, duration: Duration, timeout: Duration) -> Result<(), HandlerError> {
    if qps == 0 {
        return Err(invalid("qps must be a positive integer"));
    }
    if duration.is_zero() {
        return Err(invalid("duration must be positive"));
    }
    if timeout.is_zero() {
        return Err(invalid("timeout must be positive"));
    }
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello, World!" }))
}

/// Plain GET load test.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct BenchmarkRequest {
    pub url: String,
    pub qps: u32,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub duration: Duration,
    pub num_workers: u32,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub timeout: Duration,
}

#[instrument(skip_all, fields(url = %request.url, qps = request.qps))]
async fn benchmark(Json(request): Json<BenchmarkRequest>) -> Result<Json<Report>, HandlerError> {
    validate_job(request.qps, request.duration, request.timeout)?;

    let config = RunConfig::new(
        request.url,
        request.qps,
        request.num_workers,
        request.duration,
        request.timeout,
    );
    let report = barrage::run(config).await?;
    Ok(Json(report))
}

/// Load test against an inference completion endpoint, optionally streamed.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct FireworksBenchmarkRequest {
    pub url: String,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub token: String,
    pub stream: bool,
    pub qps: u32,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub duration: Duration,
    pub num_workers: u32,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub timeout: Duration,
}

#[instrument(skip_all, fields(url = %request.url, model = %request.model))]
async fn fireworks_benchmark(
    Json(request): Json<FireworksBenchmarkRequest>,
) -> Result<Json<Report>, HandlerError> {
    validate_job(request.qps, request.duration, request.timeout)?;
    if request.token.is_empty() {
        return Err(invalid("token must not be empty"));
    }
    if request.prompt.is_empty() {
        return Err(invalid("prompt must not be empty"));
    }
    if request.max_tokens == 0 {
        return Err(invalid("max_tokens must not be 0"));
    }

    let payload = CompletionPayload::new(
        &request.model,
        &request.prompt,
        request.max_tokens,
        request.stream,
    );
    let body = serde_json::to_value(&payload).expect("completion payload serializes");

    let config = RunConfig::new(
        request.url,
        request.qps,
        request.num_workers,
        request.duration,
        request.timeout,
    )
    .with_body(body)
    .with_headers(bearer_headers(&request.token))
    .with_streaming(request.stream);

    let report = barrage::run(config).await?;
    Ok(Json(report))
}
