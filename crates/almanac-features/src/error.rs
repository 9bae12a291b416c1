//! Feature computation errors.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while deriving features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Input frame lacks a column the feature reads
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Feature configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars failed while planning or evaluating the feature
    #[error("computation error: {0}")]
    Computation(#[from] PolarsError),
}
