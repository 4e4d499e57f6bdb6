//! A programmable HTTP load-generation engine.
//!
//! Given a target endpoint, an aggregate request rate, a worker count and a
//! run window, `barrage` produces a statistically summarized performance
//! report: latency (time to headers), full response time, optional
//! time-to-first-token for streaming endpoints, and error counts.
//!
//! The aggregate rate is split across workers (integer share each, remainder
//! on the last) and each worker paces its own request loop, one request per
//! `1/rate` seconds, until its slot quota is exhausted or the shared stop
//! signal is raised. In-flight requests are never aborted; shutdown drains,
//! and scheduled slots that shutdown pre-empted are recorded as failed
//! outcomes rather than silently dropped.
//!
//! ```ignore
//! let config = RunConfig::new(url, 100, 8, Duration::from_secs(30), Duration::from_secs(2));
//! let report = barrage::run(config).await?;
//! ```

pub mod executor;
pub mod metrics;
pub mod runner;

pub(crate) mod report;
pub(crate) mod worker;

pub use runner::{assign, run, run_with, RunError, WorkerAssignment};

pub mod prelude {
    pub use crate::executor::{Executor, HttpExecutor};
    pub use crate::runner::{run, run_with, RunError};
    pub use barrage_core::{ConfigError, ErrorKind, Report, RequestOutcome, RunConfig};
}
