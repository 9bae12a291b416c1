//! The `Feature` trait implemented by every feature family.

use crate::error::FeatureError;
use crate::registry::FeatureCategory;
use polars::prelude::*;
use std::fmt::Debug;

/// A family of derived columns computed over the merged monthly table.
pub trait Feature: Debug {
    /// Unique name of the feature family.
    fn name(&self) -> &str;

    /// Category the derived columns belong to.
    fn category(&self) -> FeatureCategory;

    /// Columns that must exist in the input frame.
    fn required_columns(&self) -> Vec<&str>;

    /// Columns this feature appends, in order.
    fn output_columns(&self) -> Vec<String>;

    /// Append the derived columns to `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn compute(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError>;
}

/// A feature built from a configuration value.
pub trait ConfiguredFeature: Feature + Sized {
    /// Configuration type for this feature.
    type Config: Default + Clone;

    /// Create the feature with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Current configuration.
    fn config(&self) -> &Self::Config;
}

/// Evaluate `expr` within each group of `partition_by`, or over the whole table
/// when no partition is given.
pub(crate) fn over_partition(expr: Expr, partition_by: &[String]) -> Expr {
    if partition_by.is_empty() {
        expr
    } else {
        let keys: Vec<Expr> = partition_by.iter().map(|c| col(c.as_str())).collect();
        expr.over(keys)
    }
}
