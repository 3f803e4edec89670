use std::path::PathBuf;

use thiserror::Error;

/// Rejection of a student entry before it reaches a store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("cgpa `{value}` is not a finite number")]
    InvalidCgpa { value: String },

    #[error("graduation year `{value}` is not an integer")]
    InvalidGraduationYear { value: String },

    #[error("student id must not be empty")]
    EmptyStudentId,

    #[error("student id `{student_id}` already exists at {institution}")]
    DuplicateStudentId { student_id: String, institution: String },

    #[error("record belongs to `{found}`, not `{expected}`")]
    InstitutionMismatch { expected: String, found: String },

    #[error("entry {index} of batch: {source}")]
    InBatch {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// File-level failure while loading, saving or exporting.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error at {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("{}: row {row}: {source}", path.display())]
    InvalidRow {
        path: PathBuf,
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("report {}: {message}", path.display())]
    Report { path: PathBuf, message: String },
}
