use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use credval_core::{NewStudent, ValidationError};
use credval_storage::RecordStore;
use tracing::warn;

use crate::{render, seed, Runner};

#[derive(Clone, Debug, PartialEq)]
pub enum DemoOutcome {
    Completed { saved: usize, report: Option<PathBuf> },
    Interrupted,
}

macro_rules! checkpoint {
    ($flag:expr) => {
        if $flag.load(Ordering::SeqCst) {
            return Ok(DemoOutcome::Interrupted);
        }
    };
}

fn report_add(out: &mut dyn Write, label: &str, result: Result<(), ValidationError>) -> Result<bool> {
    match result {
        Ok(()) => {
            writeln!(out, "  added: {label}")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "  error adding {label}: {e}")?;
            Ok(false)
        }
    }
}

fn add_one(out: &mut dyn Write, store: &dyn RecordStore, student: NewStudent) -> Result<bool> {
    let label = format!("{} ({})", student.name, student.student_id);
    report_add(out, &label, store.add(student).map(|_| ()))
}

/// Full walk-through: load and seed the network, query it, validate a mixed
/// batch, print analytics, save every institution and export the report.
/// `interrupted` is checked between phases.
pub fn run_demo(runner: &Runner, interrupted: &AtomicBool, out: &mut dyn Write) -> Result<DemoOutcome> {
    write!(out, "{}", render::heading("UNIVERSITY CREDENTIAL VALIDATION SYSTEM"))?;

    let mut system = runner.load_system()?;
    for store in system.stores() {
        writeln!(out, "Registered: {} ({} students)", store.name(), store.len())?;
    }
    checkpoint!(interrupted);

    writeln!(out, "\nADDING STUDENTS (individual)")?;
    if let Some(mit) = system.store("MIT") {
        for student in seed::mit_students() {
            add_one(out, mit.as_ref(), student)?;
        }
    }

    writeln!(out, "\nBULK ADDING STUDENTS")?;
    for (name, roster) in seed::bulk_rosters() {
        let Some(store) = system.store(name) else {
            warn!(institution = name, "institution not configured; roster skipped");
            continue;
        };
        let count = roster.len();
        let label = format!("{count} students to {name}");
        report_add(out, &label, store.add_bulk(roster).map(|_| ()))?;
    }
    checkpoint!(interrupted);

    writeln!(out, "\nQUERIES")?;
    if let Some(stanford) = system.store("Stanford University") {
        writeln!(out, "\nTop 3 students at {}:", stanford.name())?;
        write!(out, "{}", render::records(&stanford.top_n(3)))?;
    }
    writeln!(out, "\nStudents named 'Smith' across all institutions:")?;
    write!(out, "{}", render::records(&system.search_by_name("Smith")))?;
    if let Some(berkeley) = system.store("UC Berkeley") {
        writeln!(out, "\n{} students with CGPA 3.9 to 4.0:", berkeley.name())?;
        write!(out, "{}", render::records(&berkeley.range_by_cgpa(3.9, 4.0)))?;
    }
    checkpoint!(interrupted);

    writeln!(out, "\nSUBMITTING VALIDATION REQUESTS")?;
    for (id, requester) in seed::SINGLE_REQUESTS {
        system.submit(id, requester);
        writeln!(out, "  queued {id} (from {requester})")?;
    }
    let n = system.submit_bulk(seed::BULK_REQUESTS, seed::BULK_REQUESTER);
    writeln!(out, "  queued {n} requests from {}", seed::BULK_REQUESTER)?;

    let batch = system.process_all();
    for result in &batch.results {
        write!(out, "\n{}", render::request_result(result))?;
    }
    write!(out, "\n{}", render::batch(&batch.summary))?;
    checkpoint!(interrupted);

    write!(out, "\n{}", render::analytics(&system.analytics(), runner.cfg.analytics.recent_graduate_year))?;
    checkpoint!(interrupted);

    let saved = runner.save_all(&system);
    writeln!(out, "\nSaved {saved} of {} institutions to {}", system.stores().len(), runner.persistence.data_dir.display())?;

    let report = match runner.export_report(&system) {
        Ok(path) => {
            writeln!(out, "Report exported to {}", path.display())?;
            Some(path)
        }
        Err(e) => {
            warn!(error = %e, "report export failed");
            writeln!(out, "Report export failed: {e}")?;
            None
        }
    };

    write!(out, "\n{}", render::heading("DEMONSTRATION COMPLETE"))?;
    Ok(DemoOutcome::Completed { saved, report })
}
