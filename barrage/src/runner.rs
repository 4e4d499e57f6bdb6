use crate::executor::{Executor, HttpExecutor};
use crate::metrics::MetricsBuffer;
use crate::report;
use crate::worker::{PacedWorker, StopSignal};
use barrage_core::{ConfigError, Report, RunConfig};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};

/// The only errors a run can surface. Everything past validation and client
/// construction is recorded as outcome data, never raised; a started run
/// always produces a complete report.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The share of the run handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    pub index: usize,
    /// Requests per second. The per-worker rates always sum to the
    /// configured qps.
    pub qps: u32,
    /// Scheduled slots: `round(qps * duration)`.
    pub quota: u64,
}

/// Integer split of the aggregate rate: every worker gets
/// `floor(qps / num_workers)` and the last worker carries the whole
/// remainder, so nothing is dropped to rounding.
pub fn assign(qps: u32, num_workers: u32, duration: Duration) -> Vec<WorkerAssignment> {
    assert!(num_workers > 0, "num_workers must be positive");
    let base = qps / num_workers;
    let remainder = qps % num_workers;
    let last = num_workers as usize - 1;

    (0..num_workers as usize)
        .map(|index| {
            let rate = if index == last { base + remainder } else { base };
            WorkerAssignment {
                index,
                qps: rate,
                quota: (f64::from(rate) * duration.as_secs_f64()).round() as u64,
            }
        })
        .collect()
}

/// Runs the configured benchmark against the real target.
///
/// One worker task per configured worker, each with its own HTTP client;
/// workers share a single outcome buffer and stop signal. Returns once every
/// worker has drained and the report is built.
pub async fn run(config: RunConfig) -> Result<Report, RunError> {
    config.validate()?;
    let executors = (0..config.num_workers)
        .map(|_| HttpExecutor::new(&config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(run_paced(config, executors).await)
}

/// Same engine, caller-supplied executors. `make_executor` is called once per
/// worker index.
pub async fn run_with<E, F>(config: RunConfig, make_executor: F) -> Result<Report, RunError>
where
    E: Executor + Send + Sync + 'static,
    F: FnMut(usize) -> E,
{
    config.validate()?;
    let executors = (0..config.num_workers as usize).map(make_executor).collect();
    Ok(run_paced(config, executors).await)
}

#[instrument(name = "run", skip_all, fields(url = %config.url, qps = config.qps))]
async fn run_paced<E>(config: RunConfig, executors: Vec<E>) -> Report
where
    E: Executor + Send + Sync + 'static,
{
    let assignments = assign(config.qps, config.num_workers, config.duration);
    let buffer = Arc::new(MetricsBuffer::new());
    let stop = StopSignal::new();

    info!(
        "starting run: {} workers, {} rps aggregate, {:?} window",
        config.num_workers, config.qps, config.duration
    );

    let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(executors.len());
    for (assignment, executor) in assignments.into_iter().zip(executors) {
        let worker = PacedWorker {
            id: assignment.index,
            rate: assignment.qps,
            quota: assignment.quota,
            buffer: Arc::clone(&buffer),
            stop: stop.clone(),
        };
        tasks.push(tokio::spawn(worker.run(executor)));
    }

    // Wall-clock ceiling on the whole run: even with every request hanging to
    // its timeout, workers observe the signal and drain shortly after
    // duration + timeout.
    let watchdog = {
        let stop = stop.clone();
        let deadline = config.duration + config.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            stop.raise();
        })
    };

    for task in tasks {
        if let Err(err) = task.await {
            error!("worker task failed: {err}");
        }
    }
    watchdog.abort();

    let summary = buffer.summarize();
    debug!(
        total = summary.total_requests,
        errors = summary.errors,
        "run complete"
    );
    report::build(config, &summary)
}
