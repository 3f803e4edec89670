use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal state of a validation request. A request goes `Queued -> Found`
/// or `Queued -> NotFound`, nothing else.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValidationStatus {
    Found,
    NotFound,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Found => "Found",
            ValidationStatus::NotFound => "Not Found",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ValidationStatus::Found)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
