//! Winsorization
//!
//! Clips a column to the [lower, upper] percentile range of the whole table.
//! Percentiles use linear interpolation between order statistics.

use crate::error::FeatureError;
use crate::registry::FeatureCategory;
use crate::traits::{ConfiguredFeature, Feature};
use almanac_data::columns::REVENUE;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for winsorization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinsorizeConfig {
    /// Column to clip
    pub column: String,
    /// Output column name
    pub output: String,
    /// Lower percentile (default: 0.01)
    pub lower_pct: f64,
    /// Upper percentile (default: 0.99)
    pub upper_pct: f64,
}

impl Default for WinsorizeConfig {
    fn default() -> Self {
        Self {
            column: REVENUE.to_string(),
            output: "revenue_winsorized".to_string(),
            lower_pct: 0.01,
            upper_pct: 0.99,
        }
    }
}

impl WinsorizeConfig {
    /// Check that the percentiles form a valid range within [0, 1].
    pub fn validate(&self) -> Result<(), FeatureError> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.lower_pct) || !in_unit(self.upper_pct) {
            return Err(FeatureError::InvalidConfig(format!(
                "winsorize percentiles must lie in [0, 1], got {} and {}",
                self.lower_pct, self.upper_pct
            )));
        }
        if self.lower_pct > self.upper_pct {
            return Err(FeatureError::InvalidConfig(format!(
                "winsorize lower percentile {} exceeds upper percentile {}",
                self.lower_pct, self.upper_pct
            )));
        }
        Ok(())
    }
}

/// Percentile clipping of a column
#[derive(Debug)]
pub struct WinsorizeFeature {
    config: WinsorizeConfig,
}

impl Feature for WinsorizeFeature {
    fn name(&self) -> &str {
        "winsorize"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Outlier
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.config.output.clone()]
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError> {
        self.config.validate()?;

        let x = col(self.config.column.as_str());
        let lower = x
            .clone()
            .quantile(lit(self.config.lower_pct), QuantileMethod::Linear);
        let upper = x
            .clone()
            .quantile(lit(self.config.upper_pct), QuantileMethod::Linear);

        let result = data.with_columns([when(x.clone().lt(lower.clone()))
            .then(lower)
            .when(x.clone().gt(upper.clone()))
            .then(upper)
            .otherwise(x)
            .alias(self.config.output.as_str())]);

        Ok(result)
    }
}

impl ConfiguredFeature for WinsorizeFeature {
    type Config = WinsorizeConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for WinsorizeFeature {
    fn default() -> Self {
        Self::with_config(WinsorizeConfig::default())
    }
}
