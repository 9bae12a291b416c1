//! Pipeline configuration.

use crate::error::{PipelineError, Result};
use almanac_features::FeatureConfig;
use almanac_output::{DEFAULT_MISSING_TOKEN, ExportFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a dataset build.
///
/// Every field has a default, so a JSON config only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sales transactions (`date, region, customer_segment, revenue`).
    pub sales_path: PathBuf,

    /// Search interest index (`date, search_index`).
    pub search_path: PathBuf,

    /// Economic indicators (`date, gdp_growth, inflation_rate`).
    pub economic_path: PathBuf,

    /// Destination file.
    pub output_path: PathBuf,

    /// Export format (default: csv)
    pub format: ExportFormat,

    /// Token written for missing values in CSV output (default: NULL)
    pub missing_token: String,

    /// Feature engine parameters.
    pub features: FeatureConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sales_path: PathBuf::from("sales_data.csv"),
            search_path: PathBuf::from("google_trends.csv"),
            economic_path: PathBuf::from("economic_indicators.csv"),
            output_path: PathBuf::from("powerbi_dataset_monthly_advanced.csv"),
            format: ExportFormat::Csv,
            missing_token: DEFAULT_MISSING_TOKEN.to_string(),
            features: FeatureConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| PipelineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the sales input path.
    pub fn with_sales_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sales_path = path.into();
        self
    }

    /// Set the search input path.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_path = path.into();
        self
    }

    /// Set the economic input path.
    pub fn with_economic_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.economic_path = path.into();
        self
    }

    /// Set the output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the export format.
    pub const fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Replace the output file's extension with the one matching the export format.
    pub fn with_output_extension(mut self) -> Self {
        self.output_path.set_extension(self.format.extension());
        self
    }

    /// Set the missing-value token.
    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = token.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.sales_path, PathBuf::from("sales_data.csv"));
        assert_eq!(config.search_path, PathBuf::from("google_trends.csv"));
        assert_eq!(config.economic_path, PathBuf::from("economic_indicators.csv"));
        assert_eq!(
            config.output_path,
            PathBuf::from("powerbi_dataset_monthly_advanced.csv")
        );
        assert_eq!(config.format, ExportFormat::Csv);
        assert_eq!(config.missing_token, "NULL");
    }

    #[test]
    fn test_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("almanac.json");
        std::fs::write(
            &path,
            r#"{"output_path": "out.json", "format": "pretty-json", "features": {"winsorize_upper": 0.95}}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out.json"));
        assert_eq!(config.format, ExportFormat::PrettyJson);
        assert_eq!(config.features.winsorize_upper, 0.95);
        assert_eq!(config.features.winsorize_lower, 0.01);
        assert_eq!(config.sales_path, PathBuf::from("sales_data.csv"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = PipelineConfig::from_json_file(Path::new("/nonexistent/almanac.json")).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigRead { .. }));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("almanac.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = PipelineConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigParse { .. }));
    }

    #[test]
    fn test_output_extension_follows_format() {
        let config = PipelineConfig::default()
            .with_format(ExportFormat::PrettyJson)
            .with_output_extension();
        assert_eq!(
            config.output_path,
            PathBuf::from("powerbi_dataset_monthly_advanced.json")
        );

        let config = PipelineConfig::default().with_output_extension();
        assert_eq!(
            config.output_path,
            PathBuf::from("powerbi_dataset_monthly_advanced.csv")
        );
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::default()
            .with_sales_path("a.csv")
            .with_output_path("b.csv")
            .with_missing_token("NA")
            .with_format(ExportFormat::Json);
        assert_eq!(config.sales_path, PathBuf::from("a.csv"));
        assert_eq!(config.output_path, PathBuf::from("b.csv"));
        assert_eq!(config.missing_token, "NA");
        assert_eq!(config.format, ExportFormat::Json);
    }
}
