use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use credval_core::{
    count_by, BatchId, BatchSummary, InstitutionAnalytics, StudentRecord, SystemAnalytics, SystemCounters,
    TimingSummary, ValidationOutcome, ValidationRequest, ValidationStatus,
};
use credval_queue::{HistoryLog, ValidationQueue};
use credval_storage::{RecordStore, RECENT_GRADUATE_YEAR};
use tracing::{debug, info, info_span};

use crate::Config;

/// One drained request together with the record that satisfied it.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestResult {
    pub outcome: ValidationOutcome,
    pub credential: Option<StudentRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub results: Vec<RequestResult>,
}

/// Owns the request queue, the history log and the counters; searches the
/// registered stores in registration order.
pub struct ValidationSystem {
    stores: Vec<Arc<dyn RecordStore>>,
    queue: ValidationQueue,
    history: HistoryLog,
    counters: SystemCounters,
    recent_graduate_year: i32,
    top_n: usize,
}

impl Default for ValidationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationSystem {
    pub fn new() -> Self {
        Self::with_settings(RECENT_GRADUATE_YEAR, 3)
    }

    pub fn with_settings(recent_graduate_year: i32, top_n: usize) -> Self {
        Self {
            stores: Vec::new(),
            queue: ValidationQueue::new(),
            history: HistoryLog::new(),
            counters: SystemCounters::new(),
            recent_graduate_year,
            top_n,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::with_settings(cfg.analytics.recent_graduate_year, cfg.analytics.top_n)
    }

    /// Appends `store` to the search order. The caller keeps its own handle
    /// and may keep adding students between processing rounds.
    pub fn register(&mut self, store: Arc<dyn RecordStore>) {
        info!(institution = store.name(), students = store.len(), "registered institution");
        self.stores.push(store);
    }

    pub fn stores(&self) -> &[Arc<dyn RecordStore>] {
        &self.stores
    }

    pub fn store(&self, name: &str) -> Option<&Arc<dyn RecordStore>> {
        self.stores.iter().find(|s| s.name() == name)
    }

    pub fn submit(&mut self, student_id: &str, requester: &str) {
        self.queue.enqueue(ValidationRequest::new(student_id, requester));
        self.counters.record_submitted(1);
        debug!(student_id, requester, "queued validation request");
    }

    /// Queues every id for the same requester, keeping their order. Returns
    /// the number queued.
    pub fn submit_bulk<I, S>(&mut self, student_ids: I, requester: &str) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self
            .queue
            .enqueue_batch(student_ids.into_iter().map(|id| ValidationRequest::new(id.as_ref(), requester)));
        self.counters.record_submitted(added as u64);
        info!(count = added, requester, "queued validation requests");
        added
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drains the queue in FIFO order. Each request is tried against the
    /// stores in registration order and stops at the first hit.
    pub fn process_all(&mut self) -> BatchReport {
        let batch_id = BatchId::new();
        if self.queue.is_empty() {
            info!(%batch_id, "no pending validation requests");
            return BatchReport {
                summary: BatchSummary {
                    batch_id,
                    processed: 0,
                    found: 0,
                    not_found: 0,
                    total_elapsed: Duration::ZERO,
                },
                results: vec![],
            };
        }

        let span = info_span!("batch", %batch_id);
        let _guard = span.enter();
        info!(pending = self.queue.len(), "processing validation requests");

        let started = Instant::now();
        let mut results = Vec::with_capacity(self.queue.len());
        let mut found = 0;
        while let Some(request) = self.queue.dequeue() {
            let request_started = Instant::now();
            let hit = self.resolve(request.student_id.as_str());
            let elapsed = request_started.elapsed();

            let (status, institution, credential) = match hit {
                Some((institution, record)) => {
                    self.counters.record_success();
                    found += 1;
                    (ValidationStatus::Found, Some(institution), Some(record))
                }
                None => (ValidationStatus::NotFound, None, None),
            };
            debug!(student_id = %request.student_id, ?status, ?institution, "request resolved");
            let outcome = self
                .history
                .record(request.student_id, status, institution, elapsed, request.requester, Utc::now())
                .clone();
            results.push(RequestResult { outcome, credential });
        }

        let summary = BatchSummary {
            batch_id,
            processed: results.len(),
            found,
            not_found: results.len() - found,
            total_elapsed: started.elapsed(),
        };
        info!(processed = summary.processed, found = summary.found, not_found = summary.not_found, "batch complete");
        BatchReport { summary, results }
    }

    fn resolve(&self, student_id: &str) -> Option<(String, StudentRecord)> {
        self.stores
            .iter()
            .find_map(|store| store.lookup(student_id).map(|record| (store.name().to_string(), record)))
    }

    pub fn history(&self) -> &[ValidationOutcome] {
        self.history.entries()
    }

    pub fn counters(&self) -> &SystemCounters {
        &self.counters
    }

    pub fn total_students(&self) -> usize {
        self.stores.iter().map(|s| s.len()).sum()
    }

    /// Name search across all institutions, concatenated in registration
    /// order.
    pub fn search_by_name(&self, query: &str) -> Vec<StudentRecord> {
        self.stores.iter().flat_map(|s| s.search_by_name(query, false)).collect()
    }

    /// Read-only aggregation over counters, history and stores.
    pub fn analytics(&self) -> SystemAnalytics {
        let history = self.history.entries();
        let per_institution = self
            .stores
            .iter()
            .map(|s| InstitutionAnalytics {
                name: s.name().to_string(),
                statistics: s.statistics_since(self.recent_graduate_year),
                top_students: s.top_n(self.top_n),
            })
            .collect();

        SystemAnalytics {
            institutions: self.stores.len(),
            total_students: self.total_students(),
            total_requests: self.counters.total_requests_submitted(),
            successful_validations: self.counters.successful_validations(),
            not_found: self.history.count(ValidationStatus::NotFound),
            success_rate_percent: self.counters.success_rate_percent(),
            timing: TimingSummary::from_outcomes(history),
            validations_by_institution: count_by(history.iter().filter_map(|o| o.institution.as_deref())),
            requests_by_requester: count_by(history.iter().map(|o| o.requester.as_str())),
            per_institution,
        }
    }
}
