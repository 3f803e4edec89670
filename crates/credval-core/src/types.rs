use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{ids::*, model::*, ValidationError};

/// One student's credential as held by an institution.
///
/// Field order matches the persisted column order:
/// `student_id, name, university, degree, cgpa, graduation_year, enrollment_date`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: StudentId,
    pub name: String,
    #[serde(rename = "university")]
    pub institution_name: String,
    pub degree: String,
    pub cgpa: f64,
    pub graduation_year: i32,
    pub enrollment_date: NaiveDate,
}

/// Strongly-typed entry for `add` / `add_bulk`. The store supplies the
/// institution name and enrollment date.
#[derive(Clone, Debug, PartialEq)]
pub struct NewStudent {
    pub student_id: StudentId,
    pub name: String,
    pub degree: String,
    pub cgpa: f64,
    pub graduation_year: i32,
}

impl NewStudent {
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        degree: impl Into<String>,
        cgpa: f64,
        graduation_year: i32,
    ) -> Self {
        Self {
            student_id: StudentId::from_str(student_id),
            name: name.into(),
            degree: degree.into(),
            cgpa,
            graduation_year,
        }
    }

    /// Field checks that do not depend on store contents.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyStudentId);
        }
        if !self.cgpa.is_finite() {
            return Err(ValidationError::InvalidCgpa { value: self.cgpa.to_string() });
        }
        Ok(())
    }

    pub fn into_record(self, institution_name: &str, enrollment_date: NaiveDate) -> StudentRecord {
        StudentRecord {
            student_id: self.student_id,
            name: self.name,
            institution_name: institution_name.to_string(),
            degree: self.degree,
            cgpa: self.cgpa,
            graduation_year: self.graduation_year,
            enrollment_date,
        }
    }
}

/// Untyped entry as it arrives from a command line or a loose table.
/// Converting to [`NewStudent`] performs the numeric coercion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStudent {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub degree: Option<String>,
    pub cgpa: Option<String>,
    pub graduation_year: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

impl TryFrom<RawStudent> for NewStudent {
    type Error = ValidationError;

    fn try_from(raw: RawStudent) -> Result<Self, Self::Error> {
        let student_id = required(raw.student_id, "student_id")?;
        let name = required(raw.name, "name")?;
        let degree = required(raw.degree, "degree")?;
        let cgpa_raw = required(raw.cgpa, "cgpa")?;
        let year_raw = required(raw.graduation_year, "graduation_year")?;

        let cgpa = cgpa_raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::InvalidCgpa { value: cgpa_raw.clone() })?;
        let graduation_year = year_raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ValidationError::InvalidGraduationYear { value: year_raw.clone() })?;

        let student = NewStudent::new(student_id, name, degree, cgpa, graduation_year);
        student.validate()?;
        Ok(student)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationRequest {
    pub student_id: StudentId,
    pub requester: String,
}

impl ValidationRequest {
    pub fn new(student_id: impl Into<StudentId>, requester: impl Into<String>) -> Self {
        Self { student_id: student_id.into(), requester: requester.into() }
    }
}

/// History entry. Never mutated after it is appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub sequence_number: u64,
    pub timestamp: DateTime<Utc>,
    pub student_id: StudentId,
    pub status: ValidationStatus,
    pub institution: Option<String>,
    pub elapsed: Duration,
    pub requester: String,
}
