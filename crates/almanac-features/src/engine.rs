//! Feature engine composing every feature family.
//!
//! Features are applied in output-column order to the merged, gap-filled table.
//! Each one reads only the merged source columns, so global statistics such as
//! min/max and percentiles see the pre-feature revenue and search values.

use crate::calendar::CalendarFeature;
use crate::error::FeatureError;
use crate::lag::{LagConfig, LagFeature};
use crate::rolling::{RollingMeanConfig, RollingMeanFeature};
use crate::scaling::{MinMaxConfig, MinMaxFeature};
use crate::traits::{ConfiguredFeature, Feature};
use crate::winsorize::{WinsorizeConfig, WinsorizeFeature};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the feature engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Lower winsorization percentile (default: 0.01)
    pub winsorize_lower: f64,
    /// Upper winsorization percentile (default: 0.99)
    pub winsorize_upper: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            winsorize_lower: 0.01,
            winsorize_upper: 0.99,
        }
    }
}

/// Engine applying every configured feature.
#[derive(Debug)]
pub struct FeatureEngine {
    features: Vec<Box<dyn Feature>>,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new(&FeatureConfig::default())
    }
}

impl FeatureEngine {
    /// Create the standard engine:
    /// - calendar attributes
    /// - revenue lags 1 and 3 per region/segment, GDP and inflation lag 1 over all rows
    /// - revenue 3/6 rolling means per region/segment, search 6-row trend over all rows
    /// - min-max revenue and search index
    /// - winsorized revenue
    pub fn new(config: &FeatureConfig) -> Self {
        let winsorize = WinsorizeConfig {
            lower_pct: config.winsorize_lower,
            upper_pct: config.winsorize_upper,
            ..WinsorizeConfig::default()
        };

        Self {
            features: vec![
                Box::new(CalendarFeature::default()),
                Box::new(LagFeature::with_config(LagConfig::revenue())),
                Box::new(LagFeature::with_config(LagConfig::gdp())),
                Box::new(LagFeature::with_config(LagConfig::inflation())),
                Box::new(RollingMeanFeature::with_config(RollingMeanConfig::revenue())),
                Box::new(RollingMeanFeature::with_config(
                    RollingMeanConfig::search_trend(),
                )),
                Box::new(MinMaxFeature::with_config(MinMaxConfig::revenue())),
                Box::new(MinMaxFeature::with_config(MinMaxConfig::search())),
                Box::new(WinsorizeFeature::with_config(winsorize)),
            ],
        }
    }

    /// Create an engine from an explicit list of features.
    pub fn with_features(features: Vec<Box<dyn Feature>>) -> Self {
        Self { features }
    }

    /// Features in application order.
    pub fn features(&self) -> &[Box<dyn Feature>] {
        &self.features
    }

    /// Names of all derived columns, in order.
    pub fn output_columns(&self) -> Vec<String> {
        self.features
            .iter()
            .flat_map(|f| f.output_columns())
            .collect()
    }

    /// Apply every feature to `data`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::MissingColumn`] if a feature's input column is
    /// absent, or any error raised by a feature's configuration.
    pub fn compute_all(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError> {
        let mut frame = data;
        for feature in &self.features {
            let schema = frame.collect_schema()?;
            if let Some(missing) = feature
                .required_columns()
                .into_iter()
                .find(|c| !schema.contains(c))
            {
                return Err(FeatureError::MissingColumn(missing.to_string()));
            }

            tracing::debug!(feature = feature.name(), category = %feature.category(), outputs = ?feature.output_columns(), "adding feature");
            frame = feature.compute(frame)?;
        }
        Ok(frame)
    }
}
