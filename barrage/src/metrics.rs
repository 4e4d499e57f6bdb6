use barrage_core::{ErrorKind, RequestOutcome};
use std::sync::Mutex;

/// Shared, append-only collection of request outcomes.
///
/// All workers append concurrently for the length of the run; the runner
/// reads it exactly once, after every worker has exited.
#[derive(Debug, Default)]
pub struct MetricsBuffer {
    outcomes: Mutex<Vec<RequestOutcome>>,
}

impl MetricsBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: RequestOutcome) {
        self.outcomes.lock().unwrap().push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptive statistics over everything recorded so far. Latency and
    /// time-to-first-token series cover only the outcomes carrying those
    /// fields; drain records contribute to the counts but to no series.
    pub fn summarize(&self) -> Summary {
        let outcomes = self.outcomes.lock().unwrap();

        let mut errors = 0u64;
        let mut errors_status: Vec<ErrorKind> = Vec::new();
        let mut response_time = Vec::with_capacity(outcomes.len());
        let mut latency = Vec::with_capacity(outcomes.len());
        let mut time_to_first_token = Vec::new();

        for outcome in outcomes.iter() {
            if let Some(err) = &outcome.error {
                errors += 1;
                if !errors_status.contains(err) {
                    errors_status.push(err.clone());
                }
            }
            if let Some(sample) = outcome.response_time {
                response_time.push(sample.as_secs_f64());
            }
            if let Some(sample) = outcome.latency {
                latency.push(sample.as_secs_f64());
            }
            if let Some(sample) = outcome.time_to_first_token {
                time_to_first_token.push(sample.as_secs_f64());
            }
        }

        Summary {
            total_requests: outcomes.len() as u64,
            errors,
            errors_status,
            response_time: SeriesStats::compute(&response_time),
            latency: SeriesStats::compute(&latency),
            time_to_first_token: SeriesStats::compute(&time_to_first_token),
        }
    }
}

/// Aggregated view of one run, produced once at run end.
#[derive(Debug, Clone)]
pub struct Summary {
    pub total_requests: u64,
    pub errors: u64,
    /// Distinct error descriptors in first-seen order.
    pub errors_status: Vec<ErrorKind>,
    pub response_time: SeriesStats,
    pub latency: SeriesStats,
    pub time_to_first_token: SeriesStats,
}

/// Mean, sample standard deviation and percentiles of one numeric series,
/// in seconds.
///
/// The mean needs one sample; everything else needs two. Below the threshold
/// a statistic is `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub p50: Option<f64>,
    pub p90: Option<f64>,
    pub p97: Option<f64>,
    pub p99: Option<f64>,
}

impl SeriesStats {
    pub fn compute(samples: &[f64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self::default();
        }

        let mean = Some(statistical::mean(samples));
        if count < 2 {
            return Self {
                count,
                mean,
                ..Self::default()
            };
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count,
            mean,
            std_dev: Some(statistical::standard_deviation(samples, None)),
            p50: Some(percentile(&sorted, 50.0)),
            p90: Some(percentile(&sorted, 90.0)),
            p97: Some(percentile(&sorted, 97.0)),
            p99: Some(percentile(&sorted, 99.0)),
        }
    }
}

/// Percentile by linear interpolation between closest ranks. `sorted` must be
/// ascending and non-empty.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
