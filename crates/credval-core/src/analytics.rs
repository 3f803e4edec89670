use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ids::*, stats, StudentRecord, ValidationOutcome};

/// Per-institution cgpa aggregates. `Default` is the empty-store value:
/// every number is zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionStatistics {
    pub total_students: usize,
    pub average_cgpa: f64,
    pub median_cgpa: f64,
    pub highest_cgpa: f64,
    pub lowest_cgpa: f64,
    pub std_dev_cgpa: f64,
    pub degrees_offered: usize,
    pub recent_graduates: usize,
}

/// Process-wide request counters. Only the owner holding `&mut` can move
/// them, and they only ever grow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SystemCounters {
    total_requests_submitted: u64,
    successful_validations: u64,
}

impl SystemCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submitted(&mut self, count: u64) {
        self.total_requests_submitted += count;
    }

    pub fn record_success(&mut self) {
        self.successful_validations += 1;
    }

    pub fn total_requests_submitted(&self) -> u64 {
        self.total_requests_submitted
    }

    pub fn successful_validations(&self) -> u64 {
        self.successful_validations
    }

    /// Percentage of submitted requests that resolved, `0.0` before any
    /// submission.
    pub fn success_rate_percent(&self) -> f64 {
        stats::percentage(self.successful_validations, self.total_requests_submitted)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimingSummary {
    pub mean: Duration,
    pub median: Duration,
    pub fastest: Duration,
    pub slowest: Duration,
}

impl TimingSummary {
    /// `None` for an empty history.
    pub fn from_outcomes(outcomes: &[ValidationOutcome]) -> Option<Self> {
        if outcomes.is_empty() {
            return None;
        }
        let secs: Vec<f64> = outcomes.iter().map(|o| o.elapsed.as_secs_f64()).collect();
        Some(Self {
            mean: Duration::from_secs_f64(stats::mean(&secs)),
            median: Duration::from_secs_f64(stats::median(&secs)),
            fastest: outcomes.iter().map(|o| o.elapsed).min().unwrap_or_default(),
            slowest: outcomes.iter().map(|o| o.elapsed).max().unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstitutionAnalytics {
    pub name: String,
    pub statistics: InstitutionStatistics,
    pub top_students: Vec<StudentRecord>,
}

/// Everything the analytics view and the system-summary sheet show.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SystemAnalytics {
    pub institutions: usize,
    pub total_students: usize,
    pub total_requests: u64,
    pub successful_validations: u64,
    pub not_found: usize,
    pub success_rate_percent: f64,
    pub timing: Option<TimingSummary>,
    pub validations_by_institution: Vec<(String, usize)>,
    pub requests_by_requester: Vec<(String, usize)>,
    pub per_institution: Vec<InstitutionAnalytics>,
}

/// Result of draining the queue once.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchSummary {
    pub batch_id: BatchId,
    pub processed: usize,
    pub found: usize,
    pub not_found: usize,
    pub total_elapsed: Duration,
}

impl BatchSummary {
    pub fn is_empty(&self) -> bool {
        self.processed == 0
    }

    /// `None` for an empty batch or one too large to divide exactly.
    pub fn average_per_request(&self) -> Option<Duration> {
        let processed = u32::try_from(self.processed).ok().filter(|&n| n > 0)?;
        Some(self.total_elapsed / processed)
    }

    pub fn throughput_per_sec(&self) -> Option<f64> {
        let secs = self.total_elapsed.as_secs_f64();
        if self.processed == 0 || secs == 0.0 {
            return None;
        }
        Some(self.processed as f64 / secs)
    }
}

/// Count occurrences of each key, most frequent first, ties in first-seen
/// order.
pub fn count_by<'a, I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match out.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, c)) => *c += 1,
            None => out.push((key.to_string(), 1)),
        }
    }
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_guard_zero_division() {
        let mut c = SystemCounters::new();
        assert_eq!(c.success_rate_percent(), 0.0);
        c.record_submitted(4);
        c.record_success();
        assert_eq!(c.total_requests_submitted(), 4);
        assert_eq!(c.successful_validations(), 1);
        assert_eq!(c.success_rate_percent(), 25.0);
    }

    #[test]
    fn empty_batch_has_no_rates() {
        let b = BatchSummary {
            batch_id: BatchId::new(),
            processed: 0,
            found: 0,
            not_found: 0,
            total_elapsed: Duration::ZERO,
        };
        assert!(b.is_empty());
        assert_eq!(b.average_per_request(), None);
        assert_eq!(b.throughput_per_sec(), None);
    }

    #[test]
    fn average_per_request_guards_count() {
        let mut b = BatchSummary {
            batch_id: BatchId::new(),
            processed: 4,
            found: 3,
            not_found: 1,
            total_elapsed: Duration::from_millis(8),
        };
        assert_eq!(b.average_per_request(), Some(Duration::from_millis(2)));

        #[cfg(target_pointer_width = "64")]
        {
            b.processed = u32::MAX as usize + 1;
            assert_eq!(b.average_per_request(), None);
        }
    }

    #[test]
    fn count_by_orders_by_frequency_then_first_seen() {
        let counts = count_by(["Tesla", "Google", "Tesla", "Meta"]);
        assert_eq!(
            counts,
            vec![("Tesla".to_string(), 2), ("Google".to_string(), 1), ("Meta".to_string(), 1)]
        );
        assert!(TimingSummary::from_outcomes(&[]).is_none());
    }
}
