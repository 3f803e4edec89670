use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use credval_core::PersistenceError;
use credval_report::{build_report, institution_report, ReportWriter, XlsxReportWriter};
use credval_storage::RecordStore;
use credval_storage_csv::CsvPersistence;
use tracing::warn;

use crate::{Config, ValidationSystem};

/// Imperative shell around the validation core: where data lives, where
/// reports go, and how the network is loaded.
pub struct Runner {
    pub root: PathBuf,
    pub cfg: Config,
    pub persistence: CsvPersistence,
    pub reports: XlsxReportWriter,
}

impl Runner {
    /// Reads configuration only; nothing is created on disk.
    pub fn open(root: PathBuf) -> Result<Self> {
        let cfg = Config::load_or_default(&root)?;
        let persistence = CsvPersistence::new(cfg.data_dir(&root));
        let reports = XlsxReportWriter::new(cfg.reports_dir(&root));
        Ok(Self { root, cfg, persistence, reports })
    }

    /// Writes the default config when missing and creates the data and
    /// report directories.
    pub fn init_repo(root: &Path) -> Result<()> {
        let cfg_path = Config::config_path(root);
        if !cfg_path.exists() {
            Config::default().save_to(&cfg_path)?;
        }
        let runner = Self::open(root.to_path_buf())?;
        runner.persistence.init().context("create data directory")?;
        runner.reports.init().context("create reports directory")?;
        Ok(())
    }

    /// Loads every configured institution from disk and registers it in
    /// configuration order.
    pub fn load_system(&self) -> Result<ValidationSystem> {
        let mut system = ValidationSystem::from_config(&self.cfg);
        for name in &self.cfg.network.institutions {
            let store = self.persistence.load(name).with_context(|| format!("load {name}"))?;
            system.register(Arc::new(store));
        }
        Ok(system)
    }

    /// Saves every registered store. A failed save is logged and skipped;
    /// returns how many stores were written.
    pub fn save_all(&self, system: &ValidationSystem) -> usize {
        let mut saved = 0;
        for store in system.stores() {
            match self.persistence.save(store.as_ref()) {
                Ok(_) => saved += 1,
                Err(e) => warn!(institution = store.name(), error = %e, "save failed"),
            }
        }
        saved
    }

    pub fn export_report(&self, system: &ValidationSystem) -> Result<PathBuf, PersistenceError> {
        let report = build_report(system.history(), system.stores(), &system.analytics());
        self.reports.write(&report, &self.cfg.reports.file)
    }

    pub fn export_institution(&self, store: &dyn RecordStore) -> Result<PathBuf, PersistenceError> {
        let file = XlsxReportWriter::institution_file_name(store.name());
        self.reports.write(&institution_report(store), &file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credval_core::NewStudent;
    use tempfile::tempdir;

    #[test]
    fn open_has_no_side_effects() {
        let dir = tempdir().unwrap();
        let runner = Runner::open(dir.path().to_path_buf()).unwrap();
        assert!(!Config::config_path(dir.path()).exists());
        assert!(!runner.persistence.data_dir.exists());
        let system = runner.load_system().unwrap();
        assert_eq!(system.stores().len(), 4);
        assert_eq!(system.total_students(), 0);
    }

    #[test]
    fn init_creates_layout() {
        let dir = tempdir().unwrap();
        Runner::init_repo(dir.path()).unwrap();
        assert!(Config::config_path(dir.path()).exists());
        assert!(dir.path().join("data").is_dir());
        assert!(dir.path().join("reports").is_dir());
    }

    #[test]
    fn save_then_reload_network() {
        let dir = tempdir().unwrap();
        let runner = Runner::open(dir.path().to_path_buf()).unwrap();
        let system = runner.load_system().unwrap();
        system.store("MIT").unwrap().add(NewStudent::new("MIT001", "Alice Johnson", "CS", 3.85, 2023)).unwrap();
        assert_eq!(runner.save_all(&system), 4);

        let again = runner.load_system().unwrap();
        assert_eq!(again.total_students(), 1);
        assert_eq!(again.store("MIT").unwrap().lookup("MIT001").unwrap().name, "Alice Johnson");

        let path = runner.export_institution(again.store("MIT").unwrap().as_ref()).unwrap();
        assert_eq!(path, dir.path().join("reports").join("MIT_report.xlsx"));
    }
}
