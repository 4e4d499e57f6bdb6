use crate::metrics::Summary;
use barrage_core::{Report, RunConfig};

/// Assembles the final report from the run configuration and the aggregated
/// statistics. Pure construction; printing and serialization live with the
/// caller.
pub(crate) fn build(config: RunConfig, summary: &Summary) -> Report {
    let ttft = if config.streaming {
        summary.time_to_first_token
    } else {
        Default::default()
    };

    Report {
        total_requests: summary.total_requests,
        errors: summary.errors,

        mean_response_time: summary.response_time.mean,
        std_response_time: summary.response_time.std_dev,
        response_time_p50: summary.response_time.p50,
        response_time_p90: summary.response_time.p90,
        response_time_p97: summary.response_time.p97,
        response_time_p99: summary.response_time.p99,

        mean_latency: summary.latency.mean,
        std_latency: summary.latency.std_dev,
        latency_p50: summary.latency.p50,
        latency_p90: summary.latency.p90,
        latency_p97: summary.latency.p97,
        latency_p99: summary.latency.p99,

        mean_time_to_first_token: ttft.mean,
        std_time_to_first_token: ttft.std_dev,
        time_to_first_token_p50: ttft.p50,
        time_to_first_token_p90: ttft.p90,
        time_to_first_token_p97: ttft.p97,
        time_to_first_token_p99: ttft.p99,

        errors_status: (summary.errors > 0).then(|| summary.errors_status.clone()),

        config,
    }
}
