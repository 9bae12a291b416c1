//! Lag Features
//!
//! A column's value from N rows earlier. With a partition, rows are counted
//! within each group in table order; without one, the whole table is a single
//! timeline. The merged table repeats each month once per region/segment, so a
//! global lag reads the previous row, which is not necessarily the previous
//! calendar month.

use crate::error::FeatureError;
use crate::registry::FeatureCategory;
use crate::traits::{ConfiguredFeature, Feature, over_partition};
use almanac_data::columns::{GDP_GROWTH, INFLATION_RATE, PARTITION, REVENUE};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for a lag feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagConfig {
    /// Column to lag
    pub column: String,
    /// Output name prefix; columns are named `{prefix}_lag_{n}`
    pub prefix: String,
    /// Lag periods in rows (default: [1, 3])
    pub periods: Vec<usize>,
    /// Columns defining independent timelines (empty for the whole table)
    pub partition_by: Vec<String>,
}

impl LagConfig {
    /// Revenue lagged 1 and 3 periods within each region/segment.
    pub fn revenue() -> Self {
        Self {
            column: REVENUE.to_string(),
            prefix: "rev".to_string(),
            periods: vec![1, 3],
            partition_by: PARTITION.map(String::from).to_vec(),
        }
    }

    /// GDP growth lagged one row over the whole table.
    pub fn gdp() -> Self {
        Self {
            column: GDP_GROWTH.to_string(),
            prefix: "gdp".to_string(),
            periods: vec![1],
            partition_by: Vec::new(),
        }
    }

    /// Inflation rate lagged one row over the whole table.
    pub fn inflation() -> Self {
        Self {
            column: INFLATION_RATE.to_string(),
            prefix: "infl".to_string(),
            periods: vec![1],
            partition_by: Vec::new(),
        }
    }
}

impl Default for LagConfig {
    fn default() -> Self {
        Self::revenue()
    }
}

/// Lagged copies of a column
#[derive(Debug)]
pub struct LagFeature {
    config: LagConfig,
}

impl Feature for LagFeature {
    fn name(&self) -> &str {
        "lag"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Lag
    }

    fn required_columns(&self) -> Vec<&str> {
        std::iter::once(self.config.column.as_str())
            .chain(self.config.partition_by.iter().map(String::as_str))
            .collect()
    }

    fn output_columns(&self) -> Vec<String> {
        self.config
            .periods
            .iter()
            .map(|n| format!("{}_lag_{}", self.config.prefix, n))
            .collect()
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError> {
        if self.config.periods.contains(&0) {
            return Err(FeatureError::InvalidConfig(
                "lag periods must be positive".to_string(),
            ));
        }

        let lags: Vec<Expr> = self
            .config
            .periods
            .iter()
            .zip(self.output_columns())
            .map(|(n, name)| {
                over_partition(
                    col(self.config.column.as_str()).shift(lit(*n as i64)),
                    &self.config.partition_by,
                )
                .alias(name)
            })
            .collect();

        Ok(data.with_columns(lags))
    }
}

impl ConfiguredFeature for LagFeature {
    type Config = LagConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for LagFeature {
    fn default() -> Self {
        Self::with_config(LagConfig::default())
    }
}
