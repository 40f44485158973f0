use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    provider::wyoming::{DEFAULT_BASE_URL, DEFAULT_REGION},
    station::{StationNumber, StationTable},
};

/// Optional operator configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// region = "naconf"
///
/// [stations]
/// KBNA = 72327
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Archive CGI endpoint.
    pub base_url: String,

    /// Archive `region` query parameter.
    pub region: String,

    /// Extra station code to archive number entries, merged over the built-in table.
    pub stations: BTreeMap<String, u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            stations: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config from the platform location, or defaults if there is no file yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sounding", "sounding-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Built-in stations plus the ones from `[stations]`.
    pub fn station_table(&self) -> StationTable {
        StationTable::builtin().with_entries(
            self.stations.iter().map(|(code, num)| (code.as_str(), StationNumber::new(*num))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.region, "naconf");
    }

    #[test]
    fn stations_extend_builtin_table() {
        let cfg = Config::from_toml(
            r#"
            region = "europe"

            [stations]
            KBNA = 72327
            "#,
        )
        .unwrap();

        assert_eq!(cfg.region, "europe");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);

        let table = cfg.station_table();
        assert_eq!(table.resolve("KBNA").unwrap(), StationNumber::new(72327));
        assert_eq!(table.resolve("KOUN").unwrap(), StationNumber::new(72357));
    }

    #[test]
    fn bad_station_number_is_rejected() {
        let err = Config::from_toml("[stations]\nKBNA = \"abc\"").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn load_from_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));

        fs::write(&path, "region = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        fs::write(&path, "[stations]\nKXYZ = 1").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.stations.get("KXYZ"), Some(&1));
    }
}
