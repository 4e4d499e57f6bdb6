//! Web front end for the barrage engine.
//!
//! Exposes the engine behind two endpoints: `POST /benchmark` for plain GET
//! load tests and `POST /fireworks_benchmark` for inference-style completion
//! endpoints (JSON payload, bearer auth, optional streaming). Jobs are
//! validated here before the engine is invoked; validation failures come back
//! as 400s with a message instead of a report.

mod payload;
mod server;

pub use payload::{bearer_headers, CompletionPayload};
pub use server::{app, server_task, BenchmarkRequest, FireworksBenchmarkRequest, ServerError};
