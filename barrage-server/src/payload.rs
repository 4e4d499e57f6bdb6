use serde::Serialize;
use std::collections::HashMap;

/// Completion request body sent to an inference endpoint under test.
///
/// Sampling parameters are pinned so runs are comparable; only the model,
/// prompt, token budget and streaming flag vary per job.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionPayload {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub logprobs: u32,
    pub echo: bool,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub n: u32,
    pub stop: String,
    pub stream: bool,
    pub context_length_exceeded_behavior: String,
    pub user: String,
}

impl CompletionPayload {
    pub fn new(model: &str, prompt: &str, max_tokens: u32, stream: bool) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            max_tokens,
            logprobs: 2,
            echo: true,
            temperature: 1.0,
            top_p: 1.0,
            top_k: 50,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            n: 1,
            stop: "<string>".to_string(),
            stream,
            context_length_exceeded_behavior: "truncate".to_string(),
            user: "<string>".to_string(),
        }
    }
}

/// Request headers for a bearer-authenticated JSON endpoint.
pub fn bearer_headers(token: &str) -> HashMap<String, String> {
    HashMap::from([
        ("Authorization".to_string(), format!("Bearer {token}")),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}
