use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub requests: RequestsConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: "data".to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub dir: String,
    pub file: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: "reports".to_string(),
            file: "comprehensive_report.xlsx".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub recent_graduate_year: i32,
    pub top_n: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recent_graduate_year: credval_storage::RECENT_GRADUATE_YEAR,
            top_n: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestsConfig {
    pub default_requester: String,
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self { default_requester: "System".to_string() }
    }
}

/// Institutions loaded by every command, in search order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub institutions: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            institutions: crate::seed::DEMO_INSTITUTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse credval.toml")?;
        Ok(cfg)
    }

    /// Reads the config file when present, otherwise defaults. Never writes.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(".credval").join("credval.toml")
    }

    pub fn data_dir(&self, root: &Path) -> PathBuf {
        resolve(root, &self.storage.data_dir)
    }

    pub fn reports_dir(&self, root: &Path) -> PathBuf {
        resolve(root, &self.reports.dir)
    }
}

/// `~` expands to the home directory; other relative paths hang off `root`.
fn resolve(root: &Path, configured: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(configured).to_string());
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_file() {
        let dir = tempdir().unwrap();
        let cfg = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.analytics.recent_graduate_year, 2024);
        assert_eq!(cfg.network.institutions.len(), 4);
        assert_eq!(cfg.data_dir(dir.path()), dir.path().join("data"));
        assert!(!Config::config_path(dir.path()).exists());
    }

    #[test]
    fn roundtrip_and_partial_file() {
        let dir = tempdir().unwrap();
        let path = Config::config_path(dir.path());
        let mut cfg = Config::default();
        cfg.reports.file = "weekly.xlsx".into();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);

        std::fs::write(&path, "[analytics]\ntop_n = 5\n").unwrap();
        let partial = Config::load_from(&path).unwrap();
        assert_eq!(partial.analytics.top_n, 5);
        assert_eq!(partial.analytics.recent_graduate_year, 2024);
        assert_eq!(partial.storage.data_dir, "data");
    }

    #[test]
    fn absolute_dirs_are_kept() {
        let dir = tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.storage.data_dir = dir.path().join("elsewhere").display().to_string();
        assert_eq!(cfg.data_dir(Path::new("/unused")), dir.path().join("elsewhere"));
    }
}
