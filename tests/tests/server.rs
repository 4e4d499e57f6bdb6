mod utils;
#[allow(unused)]
use utils::*;

use serde_json::json;

#[tokio::test]
#[ntest::timeout(30000)]
async fn benchmark_endpoint_returns_a_report() {
    init();
    let mock = spawn_mock().await;
    let api = spawn_api().await;

    let response = reqwest::Client::new()
        .post(format!("http://{api}/benchmark"))
        .json(&json!({
            "url": format!("http://{mock}/delay/ms/2"),
            "qps": 5,
            "duration": 1,
            "num_workers": 1,
            "timeout": 2,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["config"]["qps"], 5);
    assert_eq!(report["errors"], 0);
    assert!(report["total_requests"].as_u64().unwrap() >= 4);
    assert!(report.get("errors_status").is_none());
    assert!(report.get("mean_time_to_first_token").is_none());
    assert!(report["mean_response_time"].as_f64().is_some());
}

#[tokio::test]
#[ntest::timeout(30000)]
async fn fireworks_endpoint_streams_and_reports_ttft() {
    init();
    let mock = spawn_mock().await;
    let api = spawn_api().await;

    let response = reqwest::Client::new()
        .post(format!("http://{api}/fireworks_benchmark"))
        .json(&json!({
            "url": format!("http://{mock}/completions/chunks/3/delay/ms/5"),
            "model": "accounts/fireworks/models/llama-v3-8b-instruct-hf",
            "prompt": "The snow is white because ",
            "max_tokens": 25,
            "token": "test-token",
            "stream": true,
            "qps": 3,
            "duration": 1,
            "num_workers": 1,
            "timeout": 2,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["errors"], 0);
    assert!(report["mean_time_to_first_token"].as_f64().is_some());
    // The bearer token must not leak into the echoed config.
    assert!(!report.to_string().contains("test-token"));
    // The payload itself is echoed, as submitted.
    assert_eq!(report["config"]["body"]["max_tokens"], 25);
}

#[tokio::test]
async fn validation_failures_are_client_errors() {
    init();
    let api = spawn_api().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{api}/benchmark"))
        .json(&json!({
            "url": "http://127.0.0.1:9",
            "qps": 0,
            "duration": 1,
            "num_workers": 1,
            "timeout": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("qps"));

    let response = client
        .post(format!("http://{api}/fireworks_benchmark"))
        .json(&json!({
            "url": "http://127.0.0.1:9",
            "model": "m",
            "prompt": "p",
            "max_tokens": 0,
            "token": "t",
            "stream": false,
            "qps": 1,
            "duration": 1,
            "num_workers": 1,
            "timeout": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("max_tokens"));

    let response = client
        .post(format!("http://{api}/fireworks_benchmark"))
        .json(&json!({
            "url": "http://127.0.0.1:9",
            "model": "m",
            "prompt": "p",
            "max_tokens": 25,
            "token": "",
            "stream": false,
            "qps": 1,
            "duration": 1,
            "num_workers": 1,
            "timeout": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("token"));
}

#[tokio::test]
async fn root_answers_hello() {
    init();
    let api = spawn_api().await;

    let response = reqwest::get(format!("http://{api}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Hello, World!");
}
