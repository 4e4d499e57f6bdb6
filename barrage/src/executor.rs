use crate::runner::RunError;
use barrage_core::{ErrorKind, RequestOutcome, RunConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// One request, one outcome.
///
/// Implementations never fail: every error is folded into the returned
/// [`RequestOutcome`]. Retry policy is deliberately not an executor concern;
/// the engine has none, so a failed attempt is recorded and the worker moves
/// to its next scheduled slot.
pub trait Executor {
    fn execute(&self) -> impl Future<Output = RequestOutcome> + Send;
}

/// Issues real HTTP requests with reqwest.
///
/// Each worker owns its own `HttpExecutor`, and with it its own client and
/// connection pool; connections are never shared across workers.
pub struct HttpExecutor {
    client: Client,
    url: String,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
    streaming: bool,
}

impl HttpExecutor {
    pub fn new(config: &RunConfig) -> Result<Self, RunError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        let mut headers = HeaderMap::new();
        for (name, value) in config.headers.iter().flatten() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RunError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| RunError::InvalidHeader(value.clone()))?;
            headers.insert(name, value);
        }

        Ok(Self {
            client,
            url: config.url.clone(),
            body: config.body.clone(),
            headers,
            streaming: config.streaming,
        })
    }
}

impl Executor for HttpExecutor {
    async fn execute(&self) -> RequestOutcome {
        let request = match &self.body {
            Some(body) => self.client.post(&self.url).json(body),
            None => self.client.get(&self.url),
        };
        let request = request.headers(self.headers.clone());

        let start = Instant::now();
        let mut response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                // No headers ever arrived, so no latency sample.
                return RequestOutcome::failure(None, start.elapsed(), None, transport_error(err));
            }
        };

        let latency = start.elapsed();
        let status = response.status();
        let mut time_to_first_token = None;

        let body_read = if self.streaming {
            loop {
                match response.chunk().await {
                    Ok(Some(chunk)) => {
                        if time_to_first_token.is_none() && !chunk.is_empty() {
                            time_to_first_token = Some(start.elapsed());
                        }
                    }
                    Ok(None) => break Ok(()),
                    Err(err) => break Err(err),
                }
            }
        } else {
            response.bytes().await.map(|_| ())
        };
        let response_time = start.elapsed();

        match body_read {
            Ok(()) if status == StatusCode::OK => {
                RequestOutcome::success(latency, response_time, time_to_first_token)
            }
            Ok(()) => {
                trace!(status = status.as_u16(), "non-200 response");
                RequestOutcome::failure(
                    Some(latency),
                    response_time,
                    time_to_first_token,
                    ErrorKind::Status(status.as_u16()),
                )
            }
            // Headers were received, so the latency sample stands even though
            // the body read failed.
            Err(err) => RequestOutcome::failure(
                Some(latency),
                response_time,
                time_to_first_token,
                transport_error(err),
            ),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Transport("request timed out".to_string())
    } else {
        debug!("transport failure: {err}");
        ErrorKind::Transport(err.to_string())
    }
}
