use crate::{ErrorKind, RunConfig};
use serde::Serialize;

/// Final output of a run: the echoed configuration, slot counts, and
/// descriptive statistics per measured series. All timing values are seconds.
///
/// Statistics below their sample threshold (one sample for the mean, two for
/// the standard deviation and the percentiles) are `null` rather than zero.
/// The `time_to_first_token` block appears only for streaming runs, and
/// `errors_status` only when at least one slot failed.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub config: RunConfig,
    pub total_requests: u64,
    pub errors: u64,

    pub mean_response_time: Option<f64>,
    pub std_response_time: Option<f64>,
    pub response_time_p50: Option<f64>,
    pub response_time_p90: Option<f64>,
    pub response_time_p97: Option<f64>,
    pub response_time_p99: Option<f64>,

    pub mean_latency: Option<f64>,
    pub std_latency: Option<f64>,
    pub latency_p50: Option<f64>,
    pub latency_p90: Option<f64>,
    pub latency_p97: Option<f64>,
    pub latency_p99: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_time_to_first_token: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_time_to_first_token: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_token_p50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_token_p90: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_token_p97: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_token_p99: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors_status: Option<Vec<ErrorKind>>,
}
