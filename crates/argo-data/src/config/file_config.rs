//! File configuration for CSV-backed collections

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::null_handling::NullConfig;
use crate::DataError;

/// Where the profile and measurement files live and how to read them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the profile CSV file
    pub profiles: PathBuf,

    /// Optional path to the measurement CSV file
    #[serde(default)]
    pub measurements: Option<PathBuf>,

    /// Missing-value handling
    #[serde(default)]
    pub null_config: NullConfig,
}

impl SourceConfig {
    /// Create a configuration for a profile file only
    pub fn new(profiles: PathBuf) -> Self {
        Self {
            profiles,
            measurements: None,
            null_config: NullConfig::default(),
        }
    }

    pub fn with_measurements(mut self, measurements: PathBuf) -> Self {
        self.measurements = Some(measurements);
        self
    }

    /// Read a JSON configuration; relative paths resolve against its directory
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: SourceConfig = serde_json::from_str(&text)?;
        if let Some(base) = path.parent() {
            config.profiles = base.join(&config.profiles);
            config.measurements = config.measurements.map(|m| base.join(m));
        }
        info!("Loaded source configuration from {:?}", path);
        Ok(config)
    }

    /// Get the profile file name
    pub fn file_name(&self) -> String {
        self.profiles
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let config: SourceConfig =
            serde_json::from_str(r#"{"profiles": "data/profiles.csv"}"#).unwrap();
        assert_eq!(config.profiles, PathBuf::from("data/profiles.csv"));
        assert!(config.measurements.is_none());
        assert_eq!(config.null_config, NullConfig::default());
        assert_eq!(config.file_name(), "profiles.csv");
    }

    #[test]
    fn test_builder() {
        let config = SourceConfig::new("p.csv".into()).with_measurements("m.csv".into());
        assert_eq!(config.measurements, Some(PathBuf::from("m.csv")));
    }
}
