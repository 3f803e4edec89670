use std::path::{Path, PathBuf};

use credval_core::PersistenceError;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::info;

use crate::sheets::{Cell, Report};

pub trait ReportWriter: Send + Sync {
    /// Writes `report` as `file_name` under the writer's root and returns the
    /// full path.
    fn write(&self, report: &Report, file_name: &str) -> Result<PathBuf, PersistenceError>;
}

/// Writes reports as `.xlsx` workbooks, one worksheet per sheet.
#[derive(Clone, Debug)]
pub struct XlsxReportWriter {
    pub root: PathBuf,
}

impl XlsxReportWriter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn init(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|source| PersistenceError::Io { path: self.root.clone(), source })
    }

    /// `Stanford University` -> `Stanford_University_report.xlsx`.
    pub fn institution_file_name(institution: &str) -> String {
        format!("{}_report.xlsx", institution.trim().replace(char::is_whitespace, "_"))
    }

    /// Worksheet names are capped at 31 characters and may not contain
    /// `[ ] : * ? / \`.
    fn worksheet_name(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
            .take(31)
            .collect();
        if cleaned.trim().is_empty() {
            "Sheet".to_string()
        } else {
            cleaned
        }
    }

    fn build_workbook(report: &Report) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        for sheet in &report.sheets {
            let ws = workbook.add_worksheet();
            ws.set_name(Self::worksheet_name(&sheet.name))?;
            for (c, h) in sheet.header.iter().enumerate() {
                ws.write_string_with_format(0, c as u16, h, &bold)?;
            }
            for (r, row) in sheet.rows.iter().enumerate() {
                let row_num = r as u32 + 1;
                for (c, cell) in row.iter().enumerate() {
                    let col = c as u16;
                    match cell {
                        Cell::Text(s) => {
                            ws.write_string(row_num, col, s)?;
                        }
                        Cell::Number(n) => {
                            ws.write_number(row_num, col, *n)?;
                        }
                        Cell::Integer(i) => {
                            ws.write_number(row_num, col, *i as f64)?;
                        }
                        Cell::Empty => {}
                    }
                }
            }
        }
        Ok(workbook)
    }
}

fn report_err(path: &Path) -> impl FnOnce(XlsxError) -> PersistenceError + '_ {
    move |e| PersistenceError::Report { path: path.to_path_buf(), message: e.to_string() }
}

impl ReportWriter for XlsxReportWriter {
    fn write(&self, report: &Report, file_name: &str) -> Result<PathBuf, PersistenceError> {
        let path = self.root.join(file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| PersistenceError::Io { path: parent.to_path_buf(), source })?;
        }
        let mut workbook = Self::build_workbook(report).map_err(report_err(&path))?;
        workbook.save(&path).map_err(report_err(&path))?;
        info!(path = %path.display(), sheets = report.sheets.len(), "report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::Sheet;
    use tempfile::tempdir;

    #[test]
    fn writes_multi_sheet_workbook() {
        let dir = tempdir().unwrap();
        let writer = XlsxReportWriter::new(dir.path().join("reports"));
        let report = Report {
            sheets: vec![
                Sheet {
                    name: "System Summary".into(),
                    header: vec!["Metric".into(), "Value".into()],
                    rows: vec![vec![Cell::Text("Total Students".into()), Cell::Integer(13)]],
                },
                Sheet {
                    name: "Validation History".into(),
                    header: vec!["request_id".into()],
                    rows: vec![vec![Cell::Integer(1)], vec![Cell::Empty]],
                },
            ],
        };
        let path = writer.write(&report, "comprehensive_report.xlsx").unwrap();
        assert_eq!(path, dir.path().join("reports").join("comprehensive_report.xlsx"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(XlsxReportWriter::worksheet_name("a/b:c"), "a_b_c");
        assert_eq!(XlsxReportWriter::worksheet_name(&"x".repeat(40)).len(), 31);
        assert_eq!(XlsxReportWriter::worksheet_name(""), "Sheet");
        assert_eq!(XlsxReportWriter::institution_file_name("UC Berkeley"), "UC_Berkeley_report.xlsx");
    }
}
