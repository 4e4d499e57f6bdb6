use crate::executor::Executor;
use crate::metrics::MetricsBuffer;
use barrage_core::RequestOutcome;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Cooperative shutdown flag shared by all workers and the run watchdog.
///
/// Raising it is idempotent. Workers observe it at the top of each pacing
/// iteration, never mid-request: an in-flight request always completes or
/// times out on its own before the signal is seen.
#[derive(Clone, Debug, Default)]
pub(crate) struct StopSignal {
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        if !self.raised.swap(true, Ordering::Relaxed) {
            debug!("stop signal raised");
        }
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}

/// One rate-paced request loop.
///
/// Executes requests `1/rate` seconds apart until its quota is exhausted or
/// the stop signal is raised. Requests run synchronously within the worker:
/// if a request outlasts the inter-arrival interval the schedule slips
/// instead of stacking concurrent requests.
pub(crate) struct PacedWorker {
    pub id: usize,
    /// Assigned requests per second. Never zero.
    pub rate: u32,
    /// Scheduled slots for this worker, `round(rate * duration)`.
    pub quota: u64,
    pub buffer: Arc<MetricsBuffer>,
    pub stop: StopSignal,
}

impl PacedWorker {
    pub async fn run<E: Executor>(self, executor: E) {
        if self.quota == 0 {
            // Sub-second run window left this worker without a slot. Nothing
            // to schedule, nothing to account for.
            return;
        }

        let interval = Duration::from_secs_f64(1.0 / f64::from(self.rate));
        let mut next_send = Instant::now();
        let mut completed: u64 = 0;

        loop {
            if self.stop.is_raised() {
                self.drain(next_send, interval, completed);
                break;
            }

            let outcome = executor.execute().await;
            self.record(outcome);

            next_send = Instant::now() + interval;
            tokio::time::sleep_until(next_send).await;

            completed += 1;
            if completed >= self.quota {
                // The trailing sleep above means quota exhaustion lands at
                // the end of the run window, for every worker at once.
                self.stop.raise();
                break;
            }
        }

        trace!(worker = self.id, completed, "worker exited");
    }

    /// Accounts for scheduled slots the shutdown pre-empted: every slot whose
    /// send time has already elapsed without being dispatched becomes a
    /// "request not completed" record. Slots still in the future are simply
    /// not part of the run.
    fn drain(&self, mut next_send: Instant, interval: Duration, mut completed: u64) {
        let now = Instant::now();
        let mut missed = 0u64;
        while completed < self.quota && next_send <= now {
            self.record(RequestOutcome::not_completed());
            completed += 1;
            missed += 1;
            next_send += interval;
        }
        if missed > 0 {
            debug!(worker = self.id, missed, "undispatched slots recorded at shutdown");
        }
    }

    fn record(&self, outcome: RequestOutcome) {
        if outcome.is_success() {
            metrics::counter!("barrage_requests_success").increment(1);
        } else {
            metrics::counter!("barrage_requests_error").increment(1);
        }
        if let Some(response_time) = outcome.response_time {
            metrics::histogram!("barrage_response_time").record(response_time.as_secs_f64());
        }
        self.buffer.record(outcome);
    }
}
