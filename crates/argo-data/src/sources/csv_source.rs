use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use argo_core::data::DataSource;
use argo_core::records::{Measurement, Profile};

use crate::config::{NullConfig, SourceConfig};
use crate::DataError;

/// Columns a profile file must provide; every other field is optional
pub const PROFILE_COLUMNS: &[&str] = &["id", "file", "date", "lat", "lon", "quality"];

pub const MEASUREMENT_COLUMNS: &[&str] = &[
    "id",
    "profileId",
    "depth",
    "temperature",
    "salinity",
    "pressure",
    "oxygen",
    "ph",
    "timestamp",
    "quality",
];

/// CSV data source for profile and measurement files
pub struct CsvSource {
    config: SourceConfig,
    name: String,
}

impl CsvSource {
    /// Create a new CSV source from a configuration
    pub fn new(config: SourceConfig) -> Self {
        let name = config.file_name();
        Self { config, name }
    }

    /// Load every profile from the configured file
    pub async fn load_profiles(&self) -> Result<Vec<Profile>, DataError> {
        let path = self.config.profiles.clone();
        let null_config = self.config.null_config.clone();
        tokio::task::spawn_blocking(move || read_file(&path, PROFILE_COLUMNS, &null_config)).await?
    }

    /// Load every measurement; an unconfigured file yields none
    pub async fn load_measurements(&self) -> Result<Vec<Measurement>, DataError> {
        let Some(path) = self.config.measurements.clone() else {
            debug!("No measurement file configured for {}", self.name);
            return Ok(Vec::new());
        };
        let null_config = self.config.null_config.clone();
        tokio::task::spawn_blocking(move || read_file(&path, MEASUREMENT_COLUMNS, &null_config))
            .await?
    }
}

fn read_file<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
    null_config: &NullConfig,
) -> Result<Vec<T>, DataError> {
    let file = File::open(path)?;
    let label = path.display().to_string();
    let records = read_records(BufReader::new(file), &label, required, null_config)?;
    info!("Read {} rows from {}", records.len(), label);
    Ok(records)
}

/// Parse typed rows from CSV text with a header line.
///
/// Missing-value cells are blanked before deserialization. Rows that still
/// fail to parse are skipped with a warning. A missing required column, or a
/// file where every row fails, is an error.
pub fn read_records<T: DeserializeOwned, R: Read>(
    reader: R,
    label: &str,
    required: &[&str],
    null_config: &NullConfig,
) -> Result<Vec<T>, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if let Some(missing) = required.iter().find(|column| !headers.iter().any(|h| h == **column)) {
        return Err(DataError::MissingColumn {
            file: label.to_string(),
            column: missing.to_string(),
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in csv_reader.records().enumerate() {
        let record = null_config.blank_nulls(&result?);
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                // Line numbers count the header as line 1
                warn!("Skipping {} line {}: {}", label, idx + 2, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        if rows.is_empty() {
            return Err(DataError::NoValidRows {
                file: label.to_string(),
                skipped,
            });
        }
        warn!("Skipped {} invalid rows in {}", skipped, label);
    }

    Ok(rows)
}

#[async_trait]
impl DataSource for CsvSource {
    async fn profiles(&self) -> anyhow::Result<Vec<Profile>> {
        Ok(self.load_profiles().await?)
    }

    async fn measurements(&self) -> anyhow::Result<Vec<Measurement>> {
        Ok(self.load_measurements().await?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Convenience constructor for a pair of files
pub fn csv_source(profiles: PathBuf, measurements: Option<PathBuf>) -> CsvSource {
    let mut config = SourceConfig::new(profiles);
    config.measurements = measurements;
    CsvSource::new(config)
}
