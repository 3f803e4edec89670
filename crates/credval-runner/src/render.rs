//! Human-readable views. Everything here takes already-computed values and
//! returns text; nothing is recomputed.

use std::fmt::{self, Write as _};
use std::time::Duration;

use credval_core::{stats::round2, BatchSummary, StudentRecord, SystemAnalytics, ValidationOutcome};

use crate::RequestResult;

/// Appends one formatted line. Writing into a `String` cannot fail.
fn push_line(s: &mut String, args: fmt::Arguments<'_>) {
    let _ = s.write_fmt(args);
    s.push('\n');
}

macro_rules! out {
    ($s:expr, $($arg:tt)*) => {
        push_line(&mut $s, format_args!($($arg)*))
    };
}

const RULE: &str = "======================================================================";
const THIN: &str = "------------------------------------------------------------------";

pub fn heading(title: &str) -> String {
    format!("{RULE}\n{title}\n{RULE}\n")
}

fn secs(d: Duration) -> String {
    format!("{:.4}s", d.as_secs_f64())
}

pub fn credential(record: &StudentRecord, elapsed: Duration) -> String {
    let mut s = String::new();
    s.push_str(&heading("CREDENTIAL VERIFIED"));
    out!(s, "  Student ID:       {}", record.student_id);
    out!(s, "  Name:             {}", record.name);
    out!(s, "  University:       {}", record.institution_name);
    out!(s, "  Degree:           {}", record.degree);
    out!(s, "  CGPA:             {:.2}", record.cgpa);
    out!(s, "  Graduation Year:  {}", record.graduation_year);
    out!(s, "  Enrolled:         {}", record.enrollment_date);
    out!(s, "  Processing Time:  {}", secs(elapsed));
    s
}

pub fn not_found(outcome: &ValidationOutcome) -> String {
    format!(
        "NOT FOUND: student id '{}' is not in the network\n  Requested by: {}\n  Processing time: {}\n",
        outcome.student_id,
        outcome.requester,
        secs(outcome.elapsed)
    )
}

pub fn request_result(result: &RequestResult) -> String {
    match &result.credential {
        Some(record) => credential(record, result.outcome.elapsed),
        None => not_found(&result.outcome),
    }
}

/// Batch footer. Rates are printed only when they are defined.
pub fn batch(summary: &BatchSummary) -> String {
    if summary.is_empty() {
        return "No pending validation requests\n".to_string();
    }
    let mut s = heading("VALIDATION BATCH COMPLETE");
    out!(s, "Batch:                {}", summary.batch_id);
    out!(s, "Requests processed:   {}", summary.processed);
    out!(s, "Found:                {}", summary.found);
    out!(s, "Not found:            {}", summary.not_found);
    out!(s, "Total time:           {}", secs(summary.total_elapsed));
    if let Some(avg) = summary.average_per_request() {
        out!(s, "Average per request:  {}", secs(avg));
    }
    if let Some(tps) = summary.throughput_per_sec() {
        out!(s, "Throughput:           {tps:.1} requests/second");
    }
    s
}

/// Compact table: name, id, institution, degree, cgpa.
pub fn records(records: &[StudentRecord]) -> String {
    if records.is_empty() {
        return "  (no matches)\n".to_string();
    }
    let mut s = String::new();
    out!(s, "  {:<25} {:<10} {:<22} {:<26} {:>5}", "name", "id", "university", "degree", "cgpa");
    for r in records {
        out!(
            s,
            "  {:<25} {:<10} {:<22} {:<26} {:>5.2}",
            r.name, r.student_id, r.institution_name, r.degree, r.cgpa
        );
    }
    s
}

pub fn analytics(a: &SystemAnalytics, recent_year: i32) -> String {
    let mut s = heading("SYSTEM ANALYTICS & STATISTICS");

    out!(s, "\nOVERALL SYSTEM STATISTICS\n  {THIN}");
    out!(s, "  Institutions in network:     {}", a.institutions);
    out!(s, "  Total students:              {}", a.total_students);
    out!(s, "  Total validation requests:   {}", a.total_requests);
    out!(s, "  Successful validations:      {}", a.successful_validations);
    out!(s, "  Not found:                   {}", a.not_found);
    if a.total_requests > 0 {
        out!(s, "  Success rate:                {:.2}%", round2(a.success_rate_percent));
    }

    if let Some(t) = &a.timing {
        out!(s, "\nPROCESSING TIME\n  {THIN}");
        out!(s, "  Average:  {}", secs(t.mean));
        out!(s, "  Median:   {}", secs(t.median));
        out!(s, "  Fastest:  {}", secs(t.fastest));
        out!(s, "  Slowest:  {}", secs(t.slowest));

        out!(s, "\nVALIDATIONS BY INSTITUTION\n  {THIN}");
        for (name, count) in &a.validations_by_institution {
            out!(s, "  {name:<30} {count:>3} validations");
        }
        out!(s, "\nREQUESTS BY ORGANIZATION\n  {THIN}");
        for (name, count) in &a.requests_by_requester {
            out!(s, "  {name:<30} {count:>3} requests");
        }
    }

    out!(s, "\nPER-INSTITUTION STATISTICS");
    for inst in &a.per_institution {
        let st = &inst.statistics;
        out!(s, "\n  {}\n  {THIN}", inst.name);
        out!(s, "  Total students:           {}", st.total_students);
        out!(s, "  Average CGPA:             {:.2}", st.average_cgpa);
        out!(s, "  Median CGPA:              {:.2}", st.median_cgpa);
        out!(s, "  Highest CGPA:             {:.2}", st.highest_cgpa);
        out!(s, "  Lowest CGPA:              {:.2}", st.lowest_cgpa);
        out!(s, "  Std deviation:            {:.2}", st.std_dev_cgpa);
        out!(s, "  Degrees offered:          {}", st.degrees_offered);
        out!(s, "  Recent graduates ({recent_year}+): {}", st.recent_graduates);
        if !inst.top_students.is_empty() {
            out!(s, "\n  Top {} students:", inst.top_students.len());
            for r in &inst.top_students {
                out!(s, "    - {:<25} CGPA: {:.2}", r.name, r.cgpa);
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use credval_core::{BatchId, InstitutionAnalytics, InstitutionStatistics, NewStudent};

    fn empty_analytics() -> SystemAnalytics {
        SystemAnalytics {
            institutions: 1,
            total_students: 0,
            total_requests: 0,
            successful_validations: 0,
            not_found: 0,
            success_rate_percent: 0.0,
            timing: None,
            validations_by_institution: vec![],
            requests_by_requester: vec![],
            per_institution: vec![InstitutionAnalytics {
                name: "MIT".into(),
                statistics: InstitutionStatistics::default(),
                top_students: vec![],
            }],
        }
    }

    #[test]
    fn empty_batch_text() {
        let summary = BatchSummary {
            batch_id: BatchId::new(),
            processed: 0,
            found: 0,
            not_found: 0,
            total_elapsed: Duration::ZERO,
        };
        assert_eq!(batch(&summary), "No pending validation requests\n");
    }

    #[test]
    fn analytics_text_reflects_numbers() {
        let mut a = empty_analytics();
        let text = analytics(&a, 2024);
        assert!(text.contains("Institutions in network:     1"));
        assert!(!text.contains("Success rate"));
        assert!(text.contains("Average CGPA:             0.00"));

        a.total_requests = 3;
        a.successful_validations = 2;
        a.success_rate_percent = 200.0 / 3.0;
        let text = analytics(&a, 2024);
        assert!(text.contains("Success rate:                66.67%"));
    }

    #[test]
    fn empty_record_table() {
        assert_eq!(records(&[]), "  (no matches)\n");
    }

    #[test]
    fn record_table_writes_one_line_per_row() {
        let r = NewStudent::new("MIT001", "Alice Johnson", "Computer Science", 3.85, 2023)
            .into_record("MIT", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let text = records(&[r.clone(), r]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(text.ends_with('\n'));
        assert!(lines[1].starts_with("  Alice Johnson"));
        assert!(lines[1].contains("MIT001"));
        assert!(lines[1].ends_with(" 3.85"));
    }
}
