mod utils;
#[allow(unused)]
use utils::*;

use barrage::prelude::*;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
#[ntest::timeout(30000)]
async fn successful_run_reports_clean_stats() {
    init();
    let addr = spawn_mock().await;

    let config = RunConfig::new(
        format!("http://{addr}/delay/ms/5"),
        10,
        2,
        Duration::from_secs(2),
        Duration::from_secs(2),
    );
    let report = barrage::run(config).await.unwrap();

    // 10 rps over 2s, one rounding slot of tolerance per worker.
    assert!((18..=22).contains(&report.total_requests));
    assert_eq!(report.errors, 0);
    assert!(report.errors_status.is_none());
    assert!(report.mean_time_to_first_token.is_none());

    let p50 = report.response_time_p50.unwrap();
    let p90 = report.response_time_p90.unwrap();
    let p97 = report.response_time_p97.unwrap();
    let p99 = report.response_time_p99.unwrap();
    assert!(p50 <= p90 && p90 <= p97 && p97 <= p99);

    // Headers arrive after the injected delay, the (empty) body right after.
    assert!(report.mean_latency.unwrap() >= 0.005);
    assert!(report.mean_latency.unwrap() <= report.mean_response_time.unwrap());
}

#[tokio::test]
#[ntest::timeout(30000)]
async fn failing_run_accounts_every_slot() {
    init();
    let addr = spawn_mock().await;

    let config = RunConfig::new(
        format!("http://{addr}/status/500"),
        8,
        2,
        Duration::from_secs(1),
        Duration::from_secs(2),
    );
    let report = barrage::run(config).await.unwrap();

    assert!(report.total_requests > 0);
    assert_eq!(report.errors, report.total_requests);
    assert_eq!(
        serde_json::to_value(report.errors_status.unwrap()).unwrap(),
        json!([500])
    );
    // Non-200 responses still produce latency samples.
    assert!(report.mean_latency.is_some());
}

#[tokio::test]
#[ntest::timeout(30000)]
async fn streaming_run_measures_time_to_first_token() {
    init();
    let addr = spawn_mock().await;

    let config = RunConfig::new(
        format!("http://{addr}/completions/chunks/3/delay/ms/10"),
        4,
        1,
        Duration::from_secs(1),
        Duration::from_secs(2),
    )
    .with_body(json!({ "prompt": "The snow is white because ", "stream": true }))
    .with_streaming(true);
    let report = barrage::run(config).await.unwrap();

    assert_eq!(report.errors, 0);
    let ttft = report.mean_time_to_first_token.unwrap();
    let response_time = report.mean_response_time.unwrap();
    // First chunk lands after one delay, the full body after three.
    assert!(ttft >= 0.010);
    assert!(ttft <= response_time);
    assert!(report.time_to_first_token_p99.is_some());
}

#[tokio::test]
#[ntest::timeout(30000)]
async fn unreachable_target_is_recorded_not_raised() {
    init();

    // Nothing listens on the discard port; every attempt is refused.
    let config = RunConfig::new(
        "http://127.0.0.1:9",
        5,
        1,
        Duration::from_secs(1),
        Duration::from_millis(500),
    );
    let report = barrage::run(config).await.unwrap();

    assert!(report.total_requests > 0);
    assert_eq!(report.errors, report.total_requests);
    // Headers never arrived, so there are no latency samples at all.
    assert!(report.mean_latency.is_none());
    let statuses = serde_json::to_value(report.errors_status.unwrap()).unwrap();
    assert!(statuses.as_array().unwrap().iter().all(|s| s.is_string()));
}

#[tokio::test]
async fn invalid_configs_rejected_before_any_connection() {
    init();

    let valid = RunConfig::new(
        "http://127.0.0.1:9",
        10,
        2,
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let mut zero_qps = valid.clone();
    zero_qps.qps = 0;
    assert!(matches!(
        barrage::run(zero_qps).await.unwrap_err(),
        RunError::Config(ConfigError::ZeroQps)
    ));

    let mut zero_duration = valid.clone();
    zero_duration.duration = Duration::ZERO;
    assert!(matches!(
        barrage::run(zero_duration).await.unwrap_err(),
        RunError::Config(ConfigError::ZeroDuration)
    ));

    let mut zero_timeout = valid.clone();
    zero_timeout.timeout = Duration::ZERO;
    assert!(matches!(
        barrage::run(zero_timeout).await.unwrap_err(),
        RunError::Config(ConfigError::ZeroTimeout)
    ));

    let mut underfilled = valid;
    underfilled.qps = 1;
    underfilled.num_workers = 4;
    assert!(matches!(
        barrage::run(underfilled).await.unwrap_err(),
        RunError::Config(ConfigError::RateUnderflow { .. })
    ));
}
