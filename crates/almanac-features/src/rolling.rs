//! Rolling Mean Features
//!
//! Trailing simple moving averages over a fixed number of rows. A window is
//! undefined (null) until it holds `window` non-null values, so the first
//! `window - 1` rows of each timeline are always null.

use crate::error::FeatureError;
use crate::registry::FeatureCategory;
use crate::traits::{ConfiguredFeature, Feature, over_partition};
use almanac_data::columns::{PARTITION, REVENUE, SEARCH_INDEX};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for a rolling mean feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingMeanConfig {
    /// Column to average
    pub column: String,
    /// Output name prefix; columns are named `{prefix}_roll_{window}`
    pub prefix: String,
    /// Window sizes in rows (default: [3, 6])
    pub windows: Vec<usize>,
    /// Columns defining independent timelines (empty for the whole table)
    pub partition_by: Vec<String>,
}

impl RollingMeanConfig {
    /// 3- and 6-period revenue averages within each region/segment.
    pub fn revenue() -> Self {
        Self {
            column: REVENUE.to_string(),
            prefix: "rev".to_string(),
            windows: vec![3, 6],
            partition_by: PARTITION.map(String::from).to_vec(),
        }
    }

    /// 6-period search-interest trend over the whole table.
    pub fn search_trend() -> Self {
        Self {
            column: SEARCH_INDEX.to_string(),
            prefix: "trend".to_string(),
            windows: vec![6],
            partition_by: Vec::new(),
        }
    }
}

impl Default for RollingMeanConfig {
    fn default() -> Self {
        Self::revenue()
    }
}

/// Trailing moving averages of a column
#[derive(Debug)]
pub struct RollingMeanFeature {
    config: RollingMeanConfig,
}

impl Feature for RollingMeanFeature {
    fn name(&self) -> &str {
        "rolling_mean"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Rolling
    }

    fn required_columns(&self) -> Vec<&str> {
        std::iter::once(self.config.column.as_str())
            .chain(self.config.partition_by.iter().map(String::as_str))
            .collect()
    }

    fn output_columns(&self) -> Vec<String> {
        self.config
            .windows
            .iter()
            .map(|w| format!("{}_roll_{}", self.config.prefix, w))
            .collect()
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError> {
        if self.config.windows.contains(&0) {
            return Err(FeatureError::InvalidConfig(
                "rolling windows must be positive".to_string(),
            ));
        }

        let means: Vec<Expr> = self
            .config
            .windows
            .iter()
            .zip(self.output_columns())
            .map(|(&window, name)| {
                over_partition(
                    col(self.config.column.as_str()).rolling_mean(RollingOptionsFixedWindow {
                        window_size: window,
                        min_periods: window,
                        ..Default::default()
                    }),
                    &self.config.partition_by,
                )
                .alias(name)
            })
            .collect();

        Ok(data.with_columns(means))
    }
}

impl ConfiguredFeature for RollingMeanFeature {
    type Config = RollingMeanConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for RollingMeanFeature {
    fn default() -> Self {
        Self::with_config(RollingMeanConfig::default())
    }
}
