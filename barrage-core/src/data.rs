use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Descriptor recorded for a scheduled slot that was never dispatched before
/// shutdown.
pub const NOT_COMPLETED: &str = "request not completed";

/// The measurements taken for one scheduled request slot.
///
/// Exactly one of these exists per slot in the run window, including slots
/// that were never dispatched (see [`RequestOutcome::not_completed`]).
/// Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    /// Time until the response headers were available. Present only when
    /// headers were actually received.
    pub latency: Option<Duration>,
    /// Time until the full response body was read, or until the failure
    /// point. `None` only for slots that never started.
    pub response_time: Option<Duration>,
    /// Time until the first non-empty streamed chunk. Only meaningful on
    /// streaming runs.
    pub time_to_first_token: Option<Duration>,
    /// `None` means success (HTTP 200).
    pub error: Option<ErrorKind>,
}

impl RequestOutcome {
    pub fn success(
        latency: Duration,
        response_time: Duration,
        time_to_first_token: Option<Duration>,
    ) -> Self {
        Self {
            latency: Some(latency),
            response_time: Some(response_time),
            time_to_first_token,
            error: None,
        }
    }

    pub fn failure(
        latency: Option<Duration>,
        response_time: Duration,
        time_to_first_token: Option<Duration>,
        error: ErrorKind,
    ) -> Self {
        Self {
            latency,
            response_time: Some(response_time),
            time_to_first_token,
            error: Some(error),
        }
    }

    /// A slot whose send time elapsed during shutdown without the request
    /// ever being dispatched. Carries no timing samples.
    pub fn not_completed() -> Self {
        Self {
            latency: None,
            response_time: None,
            time_to_first_token: None,
            error: Some(ErrorKind::NotCompleted),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Why a request slot failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered with a non-200 status.
    Status(u16),
    /// Connection, protocol or timeout failure; no status was received.
    Transport(String),
    /// The slot was scheduled but shutdown arrived first.
    NotCompleted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Status(code) => write!(f, "{code}"),
            ErrorKind::Transport(msg) => f.write_str(msg),
            ErrorKind::NotCompleted => f.write_str(NOT_COMPLETED),
        }
    }
}

// Statuses serialize as bare numbers and everything else as strings, so an
// `errors_status` list reads `[500, "request timed out"]`.
impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorKind::Status(code) => serializer.serialize_u16(*code),
            ErrorKind::Transport(msg) => serializer.serialize_str(msg),
            ErrorKind::NotCompleted => serializer.serialize_str(NOT_COMPLETED),
        }
    }
}
