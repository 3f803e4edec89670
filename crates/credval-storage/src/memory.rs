use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use credval_core::{NewStudent, StudentRecord, ValidationError};
use tracing::{info, warn};

use crate::traits::RecordStore;

/// In-memory institution table: records in insertion order plus a unique
/// index on student id. Construction touches nothing outside the value.
#[derive(Debug)]
pub struct InMemoryStore {
    name: String,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<StudentRecord>,
    index: HashMap<String, usize>,
}

impl Inner {
    fn insert(&mut self, record: StudentRecord) {
        self.index.insert(record.student_id.as_str().to_string(), self.records.len());
        self.records.push(record);
    }
}

impl InMemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), inner: Mutex::new(Inner::default()) }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn duplicate(&self, student_id: &str) -> ValidationError {
        ValidationError::DuplicateStudentId {
            student_id: student_id.to_string(),
            institution: self.name.clone(),
        }
    }

    /// Same as `add` but with an explicit enrollment date.
    pub fn add_enrolled_on(&self, student: NewStudent, enrolled: NaiveDate) -> Result<StudentRecord, ValidationError> {
        student.validate()?;
        let mut inner = self.lock();
        if inner.index.contains_key(student.student_id.as_str()) {
            return Err(self.duplicate(student.student_id.as_str()));
        }
        let record = student.into_record(&self.name, enrolled);
        inner.insert(record.clone());
        Ok(record)
    }

    /// Re-inserts a previously persisted record, keeping its enrollment date.
    pub fn restore(&self, record: StudentRecord) -> Result<(), ValidationError> {
        if record.institution_name != self.name {
            return Err(ValidationError::InstitutionMismatch {
                expected: self.name.clone(),
                found: record.institution_name,
            });
        }
        if record.student_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyStudentId);
        }
        if !record.cgpa.is_finite() {
            return Err(ValidationError::InvalidCgpa { value: record.cgpa.to_string() });
        }
        let mut inner = self.lock();
        if inner.index.contains_key(record.student_id.as_str()) {
            return Err(self.duplicate(record.student_id.as_str()));
        }
        inner.insert(record);
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl RecordStore for InMemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.lock().records.len()
    }

    fn lookup(&self, student_id: &str) -> Option<StudentRecord> {
        let inner = self.lock();
        inner.index.get(student_id).map(|&i| inner.records[i].clone())
    }

    fn records(&self) -> Vec<StudentRecord> {
        self.lock().records.clone()
    }

    fn add(&self, student: NewStudent) -> Result<StudentRecord, ValidationError> {
        let id = student.student_id.clone();
        match self.add_enrolled_on(student, today()) {
            Ok(record) => {
                info!(institution = %self.name, student_id = %id, "student added");
                Ok(record)
            }
            Err(e) => {
                warn!(institution = %self.name, student_id = %id, error = %e, "student rejected");
                Err(e)
            }
        }
    }

    fn add_bulk(&self, students: Vec<NewStudent>) -> Result<usize, ValidationError> {
        let enrolled = today();
        let mut inner = self.lock();

        let mut seen: HashSet<&str> = HashSet::new();
        for (index, student) in students.iter().enumerate() {
            let id = student.student_id.as_str();
            let check = student.validate().and_then(|_| {
                if inner.index.contains_key(id) || !seen.insert(id) {
                    Err(self.duplicate(id))
                } else {
                    Ok(())
                }
            });
            if let Err(source) = check {
                warn!(institution = %self.name, index, error = %source, "bulk add rejected");
                return Err(ValidationError::InBatch { index, source: Box::new(source) });
            }
        }

        let count = students.len();
        for student in students {
            inner.insert(student.into_record(&self.name, enrolled));
        }
        info!(institution = %self.name, count, "bulk add complete");
        Ok(count)
    }
}
