//! Pipeline error type.

use almanac_data::DataError;
use almanac_features::FeatureError;
use almanac_output::ExportError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while building the monthly dataset. All are fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or preparing a source failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Feature computation failed.
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Polars error between stages.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Configuration file is not valid.
    #[error("Invalid config {}: {source}", path.display())]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
