//! Target service for exercising the load engine: deterministic statuses,
//! injected delays, a coin-flip root route and a chunk-streamed completions
//! route for time-to-first-token runs.

use axum::body::{Body, Bytes};
use axum::{extract::Path, http::StatusCode, routing::get, routing::post, Json, Router};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/status/:code", get(status))
        .route("/delay/ms/:delay_ms", get(delay))
        .route(
            "/completions/chunks/:count/delay/ms/:delay_ms",
            post(completions),
        )
}

/// Binds `addr` (port 0 for ephemeral) and returns the bound address plus
/// the serve future, so tests can spawn the server and talk to it.
pub async fn bind(addr: SocketAddr) -> std::io::Result<(SocketAddr, impl Future<Output = ()>)> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let serve = async move {
        axum::serve(listener, app()).await.unwrap();
    };
    Ok((addr, serve))
}

pub async fn run(addr: SocketAddr) {
    let (addr, serve) = bind(addr).await.unwrap();
    info!("mock service listening on {addr}");
    serve.await;
}

/// Fails about half the time, like a service on a bad day.
async fn root() -> Result<Json<serde_json::Value>, StatusCode> {
    if rand::random() {
        Ok(Json(json!({ "message": "Hello, World!" })))
    } else {
        Err(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn delay(Path(delay_ms): Path<u64>) {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

/// Streams `count` chunks spaced `delay_ms` apart.
async fn completions(Path((count, delay_ms)): Path<(u32, u64)>) -> Body {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, std::io::Error>>(1);
    tokio::spawn(async move {
        for i in 0..count {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let chunk = Bytes::from(format!("data: chunk {i}\n\n"));
            if tx.send(Ok(chunk)).await.is_err() {
                break;
            }
        }
    });
    Body::from_stream(ReceiverStream::new(rx))
}
