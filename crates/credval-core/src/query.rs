//! Read-only queries over a snapshot of records. Input order is the store's
//! insertion order and every function preserves it for its matches.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::{count_by, stats, InstitutionStatistics, StudentRecord};

/// Exact mode compares case-sensitively on the whole name; otherwise a
/// case-insensitive substring match.
pub fn search_by_name(records: &[StudentRecord], query: &str, exact: bool) -> Vec<StudentRecord> {
    if exact {
        return records.iter().filter(|r| r.name == query).cloned().collect();
    }
    let needle = query.to_lowercase();
    records.iter().filter(|r| r.name.to_lowercase().contains(&needle)).cloned().collect()
}

pub fn search_by_degree(records: &[StudentRecord], query: &str) -> Vec<StudentRecord> {
    let needle = query.to_lowercase();
    records.iter().filter(|r| r.degree.to_lowercase().contains(&needle)).cloned().collect()
}

/// Inclusive on both ends.
pub fn range_by_cgpa(records: &[StudentRecord], min: f64, max: f64) -> Vec<StudentRecord> {
    records.iter().filter(|r| r.cgpa >= min && r.cgpa <= max).cloned().collect()
}

/// Highest cgpa first. The sort is stable, so equal cgpa values (`0.0` and
/// `-0.0` included) keep insertion order. Stores only hold finite cgpa.
pub fn top_n(records: &[StudentRecord], n: usize) -> Vec<StudentRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.cgpa.partial_cmp(&a.cgpa).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    sorted
}

pub fn recent_graduates(records: &[StudentRecord], since_year: i32) -> Vec<StudentRecord> {
    records.iter().filter(|r| r.graduation_year >= since_year).cloned().collect()
}

/// Count per degree, most common first; ties keep first-seen order.
pub fn degree_distribution(records: &[StudentRecord]) -> Vec<(String, usize)> {
    count_by(records.iter().map(|r| r.degree.as_str()))
}

/// Count per graduation year, ascending by year.
pub fn graduation_year_distribution(records: &[StudentRecord]) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.graduation_year).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

pub fn statistics(records: &[StudentRecord], recent_year: i32) -> InstitutionStatistics {
    if records.is_empty() {
        return InstitutionStatistics::default();
    }
    let cgpas: Vec<f64> = records.iter().map(|r| r.cgpa).collect();
    let degrees: HashSet<&str> = records.iter().map(|r| r.degree.as_str()).collect();
    InstitutionStatistics {
        total_students: records.len(),
        average_cgpa: stats::mean(&cgpas),
        median_cgpa: stats::median(&cgpas),
        highest_cgpa: stats::max(&cgpas),
        lowest_cgpa: stats::min(&cgpas),
        std_dev_cgpa: stats::sample_std_dev(&cgpas),
        degrees_offered: degrees.len(),
        recent_graduates: records.iter().filter(|r| r.graduation_year >= recent_year).count(),
    }
}
