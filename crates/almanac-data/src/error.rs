//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading and shaping the source tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Input file does not exist
    #[error("Input not found: {}", path.display())]
    InputNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Expected column missing from the header row
    #[error("Schema mismatch in {}: missing column '{column}'", path.display())]
    SchemaMismatch {
        /// File being read
        path: PathBuf,
        /// Name of the missing column
        column: String,
    },

    /// Date field could not be parsed
    #[error("Date parse error in {} at line {line}: '{value}'", path.display())]
    DateParse {
        /// File being read
        path: PathBuf,
        /// 1-based line number of the offending record
        line: u64,
        /// Raw field content
        value: String,
    },

    /// Numeric field could not be parsed
    #[error("Invalid value in {} at line {line}, column '{column}': '{value}'", path.display())]
    InvalidValue {
        /// File being read
        path: PathBuf,
        /// 1-based line number of the offending record
        line: u64,
        /// Column the field belongs to
        column: String,
        /// Raw field content
        value: String,
    },

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message() {
        let err = DataError::SchemaMismatch {
            path: PathBuf::from("sales_data.csv"),
            column: "revenue".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Schema mismatch in sales_data.csv: missing column 'revenue'"
        );
    }

    #[test]
    fn test_date_parse_message() {
        let err = DataError::DateParse {
            path: PathBuf::from("google_trends.csv"),
            line: 3,
            value: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Date parse error in google_trends.csv at line 3: 'soon'"
        );
    }
}
