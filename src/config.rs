//! Dashboard configuration.
//!
//! Defaults, optionally overridden by a JSON file, then by command line flags.

use crate::data::Location;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub central_csv: PathBuf,
    pub south_csv: PathBuf,
    /// Directory the static report is written to.
    pub output_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Open `index.html` with the system viewer after export.
    pub open_report: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            central_csv: PathBuf::from(Location::CentralJakarta.default_csv()),
            south_csv: PathBuf::from(Location::SouthJakarta.default_csv()),
            output_dir: PathBuf::from("report"),
            chart_width: 1000,
            chart_height: 500,
            open_report: false,
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Input path for a location.
    pub fn csv_for(&self, location: Location) -> &Path {
        match location {
            Location::CentralJakarta => &self.central_csv,
            Location::SouthJakarta => &self.south_csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DashboardConfig::from_json(r#"{ "output_dir": "out", "open_report": true }"#)
            .unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert!(cfg.open_report);
        assert_eq!(cfg.chart_width, 1000);
        assert_eq!(
            cfg.csv_for(Location::SouthJakarta),
            Path::new("jakarta-south (us consulate), indonesia-air-quality.csv")
        );
    }

    #[test]
    fn unknown_file_is_read_error() {
        let err = DashboardConfig::load(Path::new("/nonexistent/dashboard.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
