//! Export of the monthly dataset.
//!
//! CSV output writes a literal token (default `NULL`) for missing values so
//! that empty strings never stand in for nulls. JSON output uses `null`.
//! Content is rendered fully in memory before the file is created, so a
//! failed export never leaves a partial file behind.

use crate::fact::{MonthlyFact, OUTPUT_COLUMNS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default token written for missing values in CSV output.
pub const DEFAULT_MISSING_TOKEN: &str = "NULL";

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Output file could not be written.
    #[error("Write error for {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error while reading the final frame.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Output column absent from the final frame.
    #[error("Missing output column: {0}")]
    MissingColumn(String),

    /// Null in a column that must always hold a value.
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue {
        /// Column name.
        column: &'static str,
        /// 0-based row index.
        row: usize,
    },

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        fs::write(path, content.as_bytes()).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = content.len(), ?format, "exported dataset");
        Ok(())
    }
}

/// The enriched monthly dataset ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyDataset {
    /// Rows in output order.
    pub facts: Vec<MonthlyFact>,

    /// Token written for missing values in CSV output.
    pub missing_token: String,
}

impl MonthlyDataset {
    /// Create a dataset using the default missing-value token.
    pub fn new(facts: Vec<MonthlyFact>) -> Self {
        Self::with_missing_token(facts, DEFAULT_MISSING_TOKEN)
    }

    /// Create a dataset with a custom missing-value token.
    pub fn with_missing_token(facts: Vec<MonthlyFact>, missing_token: impl Into<String>) -> Self {
        Self {
            facts,
            missing_token: missing_token.into(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Exporter for MonthlyDataset {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(OUTPUT_COLUMNS)?;
                for fact in &self.facts {
                    wtr.write_record(fact.to_record(&self.missing_token))?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(&self.facts)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&self.facts)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::tests::sample_fact;
    use rstest::rstest;

    #[test]
    fn test_csv_header_and_sentinel() {
        let dataset = MonthlyDataset::new(vec![sample_fact()]);
        let csv = dataset.export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next().unwrap(), OUTPUT_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-03-01,North,Retail,300.0,30.0,1.4,NULL,2024,3,1,False,Spring,"));
        assert!(!row.contains(",,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_custom_missing_token() {
        let dataset = MonthlyDataset::with_missing_token(vec![sample_fact()], "NA");
        let csv = dataset.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains(",NA,"));
        assert!(!csv.contains("NULL"));
    }

    #[test]
    fn test_empty_dataset_has_header_only() {
        let dataset = MonthlyDataset::new(Vec::new());
        assert!(dataset.is_empty());
        let csv = dataset.export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_json_export() {
        let dataset = MonthlyDataset::new(vec![sample_fact()]);
        let json = dataset.export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"date\":\"2024-03-01\""));
        assert!(json.contains("\"inflation_rate\":null"));

        let parsed: Vec<MonthlyFact> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dataset.facts);
    }

    #[test]
    fn test_pretty_json_export() {
        let dataset = MonthlyDataset::new(vec![sample_fact()]);
        let json = dataset.export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("  ")); // Indentation indicates pretty format
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_parse_format(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_format() {
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        MonthlyDataset::new(vec![sample_fact()])
            .export_to_file(&path, ExportFormat::Csv)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("date,region,customer_segment,"));
    }

    #[test]
    fn test_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.csv");
        let err = MonthlyDataset::new(vec![sample_fact()])
            .export_to_file(&path, ExportFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert!(!path.exists());
    }
}
