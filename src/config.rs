//! Dashboard Configuration Module
//! Paths, remote source and aggregation policy, with optional JSON overrides.

use crate::aggregate::{Locale, SpatialJoin};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory for overrides.
pub const CONFIG_FILE_NAME: &str = "dashboard.json";

/// Content id of the published incident table.
pub const DEFAULT_REMOTE_FILE_ID: &str = "1Yda-fY9I60L_dAUha5Fk31iUC-sB_GGz";

/// `{id}` is replaced with the content id.
pub const DEFAULT_DOWNLOAD_URL: &str =
    "https://drive.google.com/uc?export=download&confirm=t&id={id}";

/// Years below this share of all incidents are folded into "Others".
pub const DEFAULT_OTHERS_THRESHOLD: f64 = 0.01;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("others_threshold must be within [0, 1), got {0}")]
    InvalidThreshold(f64),
}

/// Everything the pipeline needs to know before the first frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub incident_path: PathBuf,
    pub boundary_path: PathBuf,
    pub remote_file_id: String,
    pub download_url: String,
    pub others_threshold: f64,
    pub spatial_join: SpatialJoin,
    pub locale: Locale,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            incident_path: PathBuf::from("major-crime-indicators.csv"),
            boundary_path: PathBuf::from("toronto_neighborhoods140.geojson"),
            remote_file_id: DEFAULT_REMOTE_FILE_ID.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            others_threshold: DEFAULT_OTHERS_THRESHOLD,
            spatial_join: SpatialJoin::default(),
            locale: Locale::default(),
        }
    }
}

impl DashboardConfig {
    /// Load `dashboard.json` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load and validate a config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.others_threshold) {
            return Err(ConfigError::InvalidThreshold(self.others_threshold));
        }
        Ok(())
    }

    /// Resolved remote URL for the incident table.
    pub fn remote_url(&self) -> String {
        self.download_url.replace("{id}", &self.remote_file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_published_dataset() {
        let config = DashboardConfig::default();
        assert_eq!(
            config.remote_url(),
            "https://drive.google.com/uc?export=download&confirm=t&id=1Yda-fY9I60L_dAUha5Fk31iUC-sB_GGz"
        );
        assert_eq!(config.others_threshold, 0.01);
        assert_eq!(config.spatial_join, SpatialJoin::Inner);
        assert_eq!(config.locale, Locale::Indonesian);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        write!(
            file,
            r#"{{ "others_threshold": 0.05, "spatial_join": "keep_all_boundaries", "locale": "english" }}"#
        )
        .unwrap();

        let config = DashboardConfig::discover(dir.path()).unwrap();
        assert_eq!(config.others_threshold, 0.05);
        assert_eq!(config.spatial_join, SpatialJoin::KeepAllBoundaries);
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.incident_path, PathBuf::from("major-crime-indicators.csv"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::discover(dir.path()).unwrap();
        assert_eq!(config.remote_file_id, DEFAULT_REMOTE_FILE_ID);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "others_threshold": 1.5 }"#).unwrap();

        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(t) if t == 1.5));
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "threshold": 0.1 }"#).unwrap();

        assert!(matches!(
            DashboardConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
