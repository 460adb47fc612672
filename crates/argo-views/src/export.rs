//! Selection export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No rows selected")]
    EmptySelection,

    #[error("Unknown export format '{0}' (expected csv or json)")]
    UnknownFormat(String),
}

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn filter_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "Comma Separated Values",
            ExportFormat::Json => "JSON Document",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Write full records in the given order, returning the row count
pub fn write_records<R: Serialize, W: Write>(
    records: &[&R],
    format: ExportFormat,
    writer: W,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
        }
    }
    Ok(records.len())
}

/// Write records to a file, replacing it if it exists
pub fn export_to_file<R: Serialize>(
    records: &[&R],
    format: ExportFormat,
    path: &Path,
) -> Result<usize, ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let count = write_records(records, format, &mut writer)?;
    writer.flush()?;
    info!("Wrote {} rows to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argo_core::records::{Measurement, Profile};
    use argo_data::MockSource;

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
        assert_eq!(
            ExportFormat::from_path(Path::new("out/selection.json")),
            Some(ExportFormat::Json)
        );
        assert_eq!(ExportFormat::from_path(Path::new("selection")), None);
    }

    #[test]
    fn test_csv_export_keeps_order() {
        let profiles = MockSource::sample_profiles();
        let selected = vec![&profiles[3], &profiles[0]];

        let mut out = Vec::new();
        let count = write_records(&selected, ExportFormat::Csv, &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,file,date,lat,lon"));
        assert!(lines[1].starts_with("4,D1901396_004.nc,"));
        assert!(lines[2].starts_with("1,D1901393_001.nc,"));
    }

    #[test]
    fn test_json_export_round_trips() {
        let measurements = MockSource::sample_measurements(3);
        let selected: Vec<&Measurement> = measurements.iter().take(3).collect();

        let mut out = Vec::new();
        write_records(&selected, ExportFormat::Json, &mut out).unwrap();

        let parsed: Vec<Measurement> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].profile_id, "ARGO_001");
        let json = String::from_utf8(out).unwrap();
        assert!(json.contains("\"profileId\""));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        let profiles = MockSource::sample_profiles();
        let selected: Vec<&Profile> = profiles.iter().rev().collect();

        let count = export_to_file(&selected, ExportFormat::Json, &path).unwrap();
        assert_eq!(count, 6);

        let parsed: Vec<Profile> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let ids: Vec<u64> = parsed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(parsed[5].file, profiles[0].file);
    }

    #[test]
    fn test_unrecognized_quality_exports_verbatim() {
        let text = "id,file,date,lat,lon,quality\n7,g.nc,2023-02-01,1.5,2.5,Excellent\n";
        let profiles: Vec<Profile> = argo_data::read_records(
            text.as_bytes(),
            "case.csv",
            argo_data::sources::csv_source::PROFILE_COLUMNS,
            &argo_data::NullConfig::default(),
        )
        .unwrap();
        let selected: Vec<&Profile> = profiles.iter().collect();

        let mut out = Vec::new();
        write_records(&selected, ExportFormat::Csv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",Excellent"));
    }
}
