//! Min-Max Scaling
//!
//! `(x - min) / (max - min)` with min and max taken once over the whole column,
//! not per partition or window. When max equals min the scaled value is
//! undefined and every row gets null.

use crate::error::FeatureError;
use crate::registry::FeatureCategory;
use crate::traits::{ConfiguredFeature, Feature};
use almanac_data::columns::{REVENUE, SEARCH_INDEX};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for min-max scaling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxConfig {
    /// Column to scale
    pub column: String,
    /// Output column name
    pub output: String,
}

impl MinMaxConfig {
    /// Revenue scaled to `revenue_norm`.
    pub fn revenue() -> Self {
        Self {
            column: REVENUE.to_string(),
            output: "revenue_norm".to_string(),
        }
    }

    /// Search index scaled to `search_norm`.
    pub fn search() -> Self {
        Self {
            column: SEARCH_INDEX.to_string(),
            output: "search_norm".to_string(),
        }
    }
}

impl Default for MinMaxConfig {
    fn default() -> Self {
        Self::revenue()
    }
}

/// Min-max normalization to [0, 1]
#[derive(Debug)]
pub struct MinMaxFeature {
    config: MinMaxConfig,
}

/// Min-max expression for `column` with nulls for a degenerate range.
pub fn min_max_expr(column: &str) -> Expr {
    let x = col(column);
    let min = x.clone().min();
    let range = x.clone().max() - min.clone();

    when(range.clone().eq(lit(0.0)))
        .then(lit(NULL))
        .otherwise((x - min) / range)
}

impl Feature for MinMaxFeature {
    fn name(&self) -> &str {
        "min_max"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Scaling
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.column.as_str()]
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.config.output.clone()]
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError> {
        Ok(data.with_columns([min_max_expr(&self.config.column)
            .cast(DataType::Float64)
            .alias(self.config.output.as_str())]))
    }
}

impl ConfiguredFeature for MinMaxFeature {
    type Config = MinMaxConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for MinMaxFeature {
    fn default() -> Self {
        Self::with_config(MinMaxConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scaled(values: &[Option<f64>]) -> Vec<Option<f64>> {
        let df = df!("revenue" => values).unwrap();
        let out = MinMaxFeature::default()
            .compute(df.lazy())
            .unwrap()
            .collect()
            .unwrap();
        out.column("revenue_norm").unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_extremes_map_to_zero_and_one() {
        let out = scaled(&[Some(300.0), Some(100.0), Some(200.0), Some(100.0), Some(300.0)]);
        assert_relative_eq!(out[0].unwrap(), 1.0);
        assert_relative_eq!(out[1].unwrap(), 0.0);
        assert_relative_eq!(out[2].unwrap(), 0.5);
        assert_relative_eq!(out[3].unwrap(), 0.0);
        assert_relative_eq!(out[4].unwrap(), 1.0);
    }

    #[test]
    fn test_nulls_pass_through() {
        let out = scaled(&[None, Some(10.0), Some(20.0)]);
        assert_eq!(out[0], None);
        assert_relative_eq!(out[2].unwrap(), 1.0);
    }

    #[test]
    fn test_constant_column_is_null() {
        let out = scaled(&[Some(5.0), Some(5.0), Some(5.0)]);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn test_output_names() {
        assert_eq!(MinMaxFeature::default().output_columns(), vec!["revenue_norm"]);
        assert_eq!(
            MinMaxFeature::with_config(MinMaxConfig::search()).output_columns(),
            vec!["search_norm"]
        );
    }
}
