use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use credval_core::{stats::round2, NewStudent, ValidationStatus};
use credval_report::{build_report, Cell, STATISTICS_SHEET, STUDENTS_SHEET, SUMMARY_SHEET};
use credval_runner::{run_demo, DemoOutcome, Runner, ValidationSystem};
use credval_storage::{InMemoryStore, RecordStore};
use tempfile::tempdir;

#[test]
fn scenario_single_student_found() {
    let x = Arc::new(InMemoryStore::new("X"));
    x.add(NewStudent::new("S1", "Sam", "Physics", 3.5, 2023)).unwrap();
    let mut system = ValidationSystem::new();
    system.register(x);
    system.submit("S1", "Acme");
    system.process_all();

    let history = system.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, ValidationStatus::Found);
    assert_eq!(history[0].institution.as_deref(), Some("X"));
    assert_eq!(system.counters().successful_validations(), 1);
    assert_eq!(system.counters().total_requests_submitted(), 1);
    assert_eq!(system.analytics().success_rate_percent, 100.0);
}

#[test]
fn scenario_unknown_id_no_institutions() {
    let mut system = ValidationSystem::new();
    system.submit("S999", "Acme");
    system.process_all();
    assert_eq!(system.history().len(), 1);
    assert_eq!(system.history()[0].status, ValidationStatus::NotFound);
    assert_eq!(system.counters().successful_validations(), 0);
    assert_eq!(system.analytics().success_rate_percent, 0.0);
}

#[test]
fn scenario_report_matches_analytics() {
    let a = Arc::new(InMemoryStore::new("A"));
    a.add_bulk(vec![
        NewStudent::new("A1", "Ann", "CS", 3.2, 2024),
        NewStudent::new("A2", "Abe", "EE", 3.9, 2022),
    ])
    .unwrap();
    let mut system = ValidationSystem::new();
    system.register(a);
    system.submit_bulk(["A1", "NOPE", "A2"], "Acme");
    system.process_all();

    let analytics = system.analytics();
    let report = build_report(system.history(), system.stores(), &analytics);
    assert_eq!(report.sheets.len(), 4);
    assert_eq!(report.sheet(STUDENTS_SHEET).unwrap().rows.len(), 2);
    assert_eq!(report.sheet(STATISTICS_SHEET).unwrap().rows[0][1], Cell::Integer(2));
    let summary = report.sheet(SUMMARY_SHEET).unwrap();
    assert_eq!(summary.rows[2][1], Cell::Integer(3));
    assert_eq!(summary.rows[3][1], Cell::Integer(2));
    assert_eq!(summary.rows[4][1], Cell::Number(round2(analytics.success_rate_percent)));
    assert_eq!(summary.rows[4][1], Cell::Number(66.67));
}

#[test]
fn scenario_demo_end_to_end_and_rerun() {
    let dir = tempdir().unwrap();
    let runner = Runner::open(dir.path().to_path_buf()).unwrap();
    let flag = AtomicBool::new(false);

    let mut out = Vec::new();
    let outcome = run_demo(&runner, &flag, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    match outcome {
        DemoOutcome::Completed { saved, report } => {
            assert_eq!(saved, 4);
            let path = report.expect("report path");
            assert!(path.exists());
            assert_eq!(path, dir.path().join("reports").join("comprehensive_report.xlsx"));
        }
        DemoOutcome::Interrupted => panic!("demo should not be interrupted"),
    }
    assert!(text.contains("NOT FOUND: student id 'MIT999'"));
    assert!(text.contains("Success rate:                88.89%"));
    assert!(dir.path().join("data").join("UC_Berkeley_students.csv").exists());

    // Second run loads the saved rosters; re-seeding is rejected as duplicates.
    let system = runner.load_system().unwrap();
    assert_eq!(system.total_students(), 13);
    let mut out = Vec::new();
    run_demo(&runner, &flag, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("error adding Alice Johnson (MIT001)"));
    assert_eq!(runner.load_system().unwrap().total_students(), 13);
}

#[test]
fn scenario_demo_stops_when_interrupted() {
    let dir = tempdir().unwrap();
    let runner = Runner::open(dir.path().to_path_buf()).unwrap();
    let flag = AtomicBool::new(true);
    let mut out = Vec::new();
    assert_eq!(run_demo(&runner, &flag, &mut out).unwrap(), DemoOutcome::Interrupted);
    assert!(!dir.path().join("reports").exists());
}
