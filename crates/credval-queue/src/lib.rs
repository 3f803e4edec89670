use std::collections::VecDeque;

use credval_core::ValidationRequest;

pub mod history;

pub use history::*;

/// Pending validation requests in submission order. No priority, no
/// deduplication: every request leaves the queue exactly once.
#[derive(Clone, Debug, Default)]
pub struct ValidationQueue {
    pending: VecDeque<ValidationRequest>,
}

impl ValidationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, request: ValidationRequest) {
        self.pending.push_back(request);
    }

    /// Appends the whole batch, keeping its internal order. Returns how many
    /// requests were added.
    pub fn enqueue_batch<I>(&mut self, requests: I) -> usize
    where
        I: IntoIterator<Item = ValidationRequest>,
    {
        let before = self.pending.len();
        self.pending.extend(requests);
        self.pending.len() - before
    }

    pub fn dequeue(&mut self) -> Option<ValidationRequest> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ValidationRequest> {
        self.pending.iter()
    }
}
