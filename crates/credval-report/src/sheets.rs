use std::sync::Arc;

use chrono::SecondsFormat;
use credval_core::{stats::round2, InstitutionAnalytics, StudentRecord, SystemAnalytics, ValidationOutcome};
use credval_storage::RecordStore;
use serde::{Deserialize, Serialize};

pub const HISTORY_SHEET: &str = "Validation History";
pub const STUDENTS_SHEET: &str = "All Students";
pub const STATISTICS_SHEET: &str = "Statistics";
pub const SUMMARY_SHEET: &str = "System Summary";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    Empty,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: vec![],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

pub fn history_sheet(outcomes: &[ValidationOutcome]) -> Sheet {
    let mut sheet = Sheet::new(
        HISTORY_SHEET,
        &["request_id", "timestamp", "student_id", "status", "university", "processing_time", "requester"],
    );
    for o in outcomes {
        sheet.rows.push(vec![
            Cell::Integer(o.sequence_number as i64),
            Cell::Text(o.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
            o.student_id.as_str().into(),
            o.status.as_str().into(),
            o.institution.as_deref().unwrap_or("N/A").into(),
            Cell::Number(o.elapsed.as_secs_f64()),
            o.requester.as_str().into(),
        ]);
    }
    sheet
}

fn roster_rows(sheet: &mut Sheet, records: &[StudentRecord]) {
    for r in records {
        sheet.rows.push(vec![
            r.student_id.as_str().into(),
            r.name.as_str().into(),
            r.institution_name.as_str().into(),
            r.degree.as_str().into(),
            Cell::Number(r.cgpa),
            Cell::Integer(r.graduation_year as i64),
            r.enrollment_date.format("%Y-%m-%d").to_string().into(),
        ]);
    }
}

const ROSTER_HEADER: [&str; 7] =
    ["student_id", "name", "university", "degree", "cgpa", "graduation_year", "enrollment_date"];

/// Every student of every store, stores in registration order.
pub fn students_sheet(stores: &[Arc<dyn RecordStore>]) -> Sheet {
    let mut sheet = Sheet::new(STUDENTS_SHEET, &ROSTER_HEADER);
    for store in stores {
        roster_rows(&mut sheet, &store.records());
    }
    sheet
}

pub fn statistics_sheet(per_institution: &[InstitutionAnalytics]) -> Sheet {
    let mut sheet = Sheet::new(
        STATISTICS_SHEET,
        &[
            "university",
            "total_students",
            "average_cgpa",
            "median_cgpa",
            "highest_cgpa",
            "lowest_cgpa",
            "std_dev_cgpa",
            "degrees_offered",
            "recent_graduates",
        ],
    );
    for inst in per_institution {
        let s = &inst.statistics;
        sheet.rows.push(vec![
            inst.name.as_str().into(),
            Cell::Integer(s.total_students as i64),
            Cell::Number(round2(s.average_cgpa)),
            Cell::Number(round2(s.median_cgpa)),
            Cell::Number(round2(s.highest_cgpa)),
            Cell::Number(round2(s.lowest_cgpa)),
            Cell::Number(round2(s.std_dev_cgpa)),
            Cell::Integer(s.degrees_offered as i64),
            Cell::Integer(s.recent_graduates as i64),
        ]);
    }
    sheet
}

pub fn summary_sheet(analytics: &SystemAnalytics) -> Sheet {
    let mut sheet = Sheet::new(SUMMARY_SHEET, &["Metric", "Value"]);
    let rows = [
        ("Total Institutions", Cell::Integer(analytics.institutions as i64)),
        ("Total Students", Cell::Integer(analytics.total_students as i64)),
        ("Total Validation Requests", Cell::Integer(analytics.total_requests as i64)),
        ("Successful Validations", Cell::Integer(analytics.successful_validations as i64)),
        ("Success Rate (%)", Cell::Number(round2(analytics.success_rate_percent))),
    ];
    for (metric, value) in rows {
        sheet.rows.push(vec![metric.into(), value]);
    }
    sheet
}

/// The comprehensive report. "All Students" is left out when no store
/// holds a student and "Statistics" when no institution is registered.
pub fn build_report(
    outcomes: &[ValidationOutcome],
    stores: &[Arc<dyn RecordStore>],
    analytics: &SystemAnalytics,
) -> Report {
    let mut sheets = vec![history_sheet(outcomes)];
    let students = students_sheet(stores);
    if !students.rows.is_empty() {
        sheets.push(students);
    }
    if !analytics.per_institution.is_empty() {
        sheets.push(statistics_sheet(&analytics.per_institution));
    }
    sheets.push(summary_sheet(analytics));
    Report { sheets }
}

/// Single-sheet roster for one institution, named after it.
pub fn institution_report(store: &dyn RecordStore) -> Report {
    let mut sheet = Sheet::new(store.name(), &ROSTER_HEADER);
    roster_rows(&mut sheet, &store.records());
    Report { sheets: vec![sheet] }
}
