use std::time::Duration;

use chrono::{DateTime, Utc};
use credval_core::{StudentId, ValidationOutcome, ValidationStatus};

/// Append-only record of completed validations, in processing order.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    entries: Vec<ValidationOutcome>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome; its sequence number is its 1-based position.
    pub fn record(
        &mut self,
        student_id: StudentId,
        status: ValidationStatus,
        institution: Option<String>,
        elapsed: Duration,
        requester: String,
        timestamp: DateTime<Utc>,
    ) -> &ValidationOutcome {
        let sequence_number = self.entries.len() as u64 + 1;
        self.entries.push(ValidationOutcome {
            sequence_number,
            timestamp,
            student_id,
            status,
            institution,
            elapsed,
            requester,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ValidationOutcome] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: ValidationStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}
