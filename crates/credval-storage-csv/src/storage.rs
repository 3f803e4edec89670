use std::path::{Path, PathBuf};

use credval_core::{PersistenceError, StudentRecord};
use credval_storage::{InMemoryStore, RecordStore};
use tracing::{debug, info};

/// Column order of every institution file.
pub const HEADER: [&str; 7] = [
    "student_id",
    "name",
    "university",
    "degree",
    "cgpa",
    "graduation_year",
    "enrollment_date",
];

/// One comma-delimited UTF-8 file per institution under `data_dir`.
#[derive(Clone, Debug)]
pub struct CsvPersistence {
    pub data_dir: PathBuf,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io { path: path.to_path_buf(), source }
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Csv { path: path.to_path_buf(), source: Box::new(source) }
}

impl CsvPersistence {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Creates `data_dir`. Nothing else in this type touches the filesystem
    /// until `load` or `save` is called.
    pub fn init(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.data_dir).map_err(io_err(&self.data_dir))
    }

    /// `MIT` -> `<data_dir>/MIT_students.csv`,
    /// `UC Berkeley` -> `<data_dir>/UC_Berkeley_students.csv`.
    pub fn path_for(&self, institution: &str) -> PathBuf {
        let stem = institution.trim().replace(char::is_whitespace, "_");
        self.data_dir.join(format!("{stem}_students.csv"))
    }

    /// Loads the institution's file into a fresh store. A missing file is an
    /// empty store. The unique id index is rebuilt; a repeated id or a row
    /// for another institution fails the load.
    pub fn load(&self, institution: &str) -> Result<InMemoryStore, PersistenceError> {
        let store = InMemoryStore::new(institution);
        let path = self.path_for(institution);
        if !path.exists() {
            debug!(institution, path = %path.display(), "no saved data; starting empty");
            return Ok(store);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(csv_err(&path))?;
        for (i, row) in reader.deserialize::<StudentRecord>().enumerate() {
            let record = row.map_err(csv_err(&path))?;
            store.restore(record).map_err(|source| PersistenceError::InvalidRow {
                path: path.clone(),
                row: i + 1,
                source,
            })?;
        }
        info!(institution, students = store.len(), path = %path.display(), "loaded institution");
        Ok(store)
    }

    /// Overwrites the institution's file with every record, header first.
    pub fn save(&self, store: &dyn RecordStore) -> Result<PathBuf, PersistenceError> {
        let path = self.path_for(store.name());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(csv_err(&path))?;
        writer.write_record(HEADER).map_err(csv_err(&path))?;
        let records = store.records();
        for record in &records {
            writer.serialize(record).map_err(csv_err(&path))?;
        }
        writer.flush().map_err(io_err(&path))?;
        info!(institution = store.name(), students = records.len(), path = %path.display(), "saved institution");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use credval_core::{NewStudent, ValidationError};
    use tempfile::tempdir;

    #[test]
    fn path_replaces_whitespace() {
        let p = CsvPersistence::new("data");
        assert_eq!(p.path_for("MIT"), Path::new("data").join("MIT_students.csv"));
        assert_eq!(p.path_for("Stanford University"), Path::new("data").join("Stanford_University_students.csv"));
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path().join("data"));
        let store = p.load("UC Berkeley").unwrap();
        assert_eq!(store.name(), "UC Berkeley");
        assert!(store.is_empty());
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path());
        let store = InMemoryStore::new("Harvard University");
        let enrolled = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        store.add_enrolled_on(NewStudent::new("HARV001", "Jane Doe", "Computer Science", 3.81, 2023), enrolled).unwrap();
        store.add(NewStudent::new("HARV002", "John Smith", "Information Technology", 3.68, 2024)).unwrap();
        store.add(NewStudent::new("HARV003", "María García, Jr.", "Data Analytics", 3.92, 2024)).unwrap();

        let path = p.save(&store).unwrap();
        assert_eq!(path, dir.path().join("Harvard_University_students.csv"));

        let reloaded = p.load("Harvard University").unwrap();
        assert_eq!(reloaded.len(), 3);
        for id in ["HARV001", "HARV002", "HARV003"] {
            assert_eq!(reloaded.lookup(id), store.lookup(id));
        }
        assert_eq!(reloaded.lookup("HARV001").unwrap().enrollment_date, enrolled);
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn empty_store_still_writes_header() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path());
        let path = p.save(&InMemoryStore::new("MIT")).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().next(), Some("student_id,name,university,degree,cgpa,graduation_year,enrollment_date"));
        assert!(p.load("MIT").unwrap().is_empty());
    }

    #[test]
    fn repeated_id_in_file_fails_load() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path());
        std::fs::write(
            p.path_for("MIT"),
            "student_id,name,university,degree,cgpa,graduation_year,enrollment_date\n\
             MIT001,Alice,MIT,CS,3.85,2023,2024-01-02\n\
             MIT001,Alice Again,MIT,CS,3.10,2023,2024-01-03\n",
        )
        .unwrap();
        match p.load("MIT") {
            Err(PersistenceError::InvalidRow { row, source, .. }) => {
                assert_eq!(row, 2);
                assert!(matches!(source, ValidationError::DuplicateStudentId { .. }));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn malformed_number_fails_load() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path());
        std::fs::write(
            p.path_for("MIT"),
            "student_id,name,university,degree,cgpa,graduation_year,enrollment_date\n\
             MIT001,Alice,MIT,CS,high,2023,2024-01-02\n",
        )
        .unwrap();
        assert!(matches!(p.load("MIT"), Err(PersistenceError::Csv { .. })));
    }

    #[test]
    fn non_finite_cgpa_fails_load() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path());
        for bad in ["NaN", "inf", "-inf"] {
            std::fs::write(
                p.path_for("MIT"),
                format!(
                    "student_id,name,university,degree,cgpa,graduation_year,enrollment_date\n\
                     MIT002,Bob,MIT,EE,3.5,2024,2024-01-02\n\
                     MIT001,Alice,MIT,CS,{bad},2023,2024-01-02\n"
                ),
            )
            .unwrap();
            match p.load("MIT") {
                Err(PersistenceError::InvalidRow { row, source, .. }) => {
                    assert_eq!(row, 2);
                    assert!(matches!(source, ValidationError::InvalidCgpa { .. }));
                }
                other => panic!("expected InvalidRow for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn init_creates_data_dir() {
        let dir = tempdir().unwrap();
        let p = CsvPersistence::new(dir.path().join("nested").join("data"));
        p.init().unwrap();
        assert!(p.data_dir.is_dir());
    }
}
