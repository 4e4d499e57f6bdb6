use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Immutable description of a single load-generation run.
///
/// `duration` and `timeout` serialize as (fractional) seconds so the JSON
/// surface carries plain numbers. `headers` is never serialized: it is where
/// bearer tokens live and the config is echoed back inside every [`Report`].
///
/// [`Report`]: crate::Report
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub url: String,
    pub qps: u32,
    pub num_workers: u32,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub duration: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(default, skip)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub streaming: bool,
}

impl RunConfig {
    /// Config for a plain GET benchmark against `url`.
    pub fn new(
        url: impl Into<String>,
        qps: u32,
        num_workers: u32,
        duration: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            qps,
            num_workers,
            duration,
            timeout,
            body: None,
            headers: None,
            streaming: false,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Rejects configurations no run should be started with. Checked before
    /// any request is issued; everything that can go wrong after this point
    /// is recorded as data rather than raised.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qps == 0 {
            return Err(ConfigError::ZeroQps);
        }
        if self.num_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        // Integer split of qps across workers must leave every worker with a
        // rate of at least one request per second.
        if self.qps < self.num_workers {
            return Err(ConfigError::RateUnderflow {
                qps: self.qps,
                num_workers: self.num_workers,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("qps must be a positive integer")]
    ZeroQps,

    #[error("num_workers must be a positive integer")]
    ZeroWorkers,

    #[error("duration must be positive")]
    ZeroDuration,

    #[error("timeout must be positive")]
    ZeroTimeout,

    #[error("qps ({qps}) is lower than num_workers ({num_workers}); every worker needs a rate of at least 1 request/s")]
    RateUnderflow { qps: u32, num_workers: u32 },
}
