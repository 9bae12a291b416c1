//! The dataset build pipeline.
//!
//! Stages run strictly in sequence over in-memory tables:
//! load, aggregate and merge, fill gaps, derive features, export.

use crate::config::PipelineConfig;
use crate::error::Result;
use almanac_data::{
    EconomicRecord, GapFillPolicy, SalesRecord, SearchIndexRecord, fill_gaps, load_economic,
    load_sales, load_search, merge_monthly, monthly_economic, monthly_sales, monthly_search,
};
use almanac_features::FeatureEngine;
use almanac_output::{DatasetSummary, Exporter, MonthlyDataset, MonthlyFact, OUTPUT_COLUMNS};
use polars::prelude::*;
use std::fmt;
use std::path::PathBuf;

/// A pipeline stage, reported to progress callbacks before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the three source files.
    Load,
    /// Monthly aggregation, merge and gap filling.
    Merge,
    /// Feature derivation.
    Features,
    /// Writing the output file.
    Export,
}

impl Stage {
    /// All stages, in execution order.
    pub const ALL: [Self; 4] = [Self::Load, Self::Merge, Self::Features, Self::Export];

    /// Human-readable description of the stage.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Load => "Loading source files...",
            Self::Merge => "Aggregating and merging monthly data...",
            Self::Features => "Deriving features...",
            Self::Export => "Writing dataset...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Parsed rows of the three input sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources {
    /// Sales transactions.
    pub sales: Vec<SalesRecord>,
    /// Search index observations.
    pub search: Vec<SearchIndexRecord>,
    /// Economic indicator observations.
    pub economic: Vec<EconomicRecord>,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Path of the written file.
    pub path: PathBuf,
    /// The exported dataset.
    pub dataset: MonthlyDataset,
    /// Summary of the exported dataset.
    pub summary: DatasetSummary,
}

/// Merge the sources onto the monthly sales grid and fill gaps.
///
/// The result has one row per (month, region, customer_segment) present in the
/// sales data, sorted by date then region then segment.
///
/// # Errors
///
/// Returns an error if a Polars operation fails.
pub fn merge_sources(sources: &Sources) -> Result<DataFrame> {
    let merged = merge_monthly(
        monthly_sales(&sources.sales)?,
        monthly_search(&sources.search)?,
        monthly_economic(&sources.economic)?,
    );
    let filled = fill_gaps(merged, &GapFillPolicy::default()).collect()?;
    tracing::debug!(rows = filled.height(), "merged and gap-filled monthly sources");

    Ok(filled)
}

/// Derive features and select the output columns in file order.
///
/// # Errors
///
/// Returns an error if a feature input is missing or a Polars operation fails.
pub fn derive_features(merged: DataFrame, engine: &FeatureEngine) -> Result<DataFrame> {
    let columns: Vec<Expr> = OUTPUT_COLUMNS.iter().map(|c| col(*c)).collect();
    let enriched = engine.compute_all(merged.lazy())?.select(columns).collect()?;
    tracing::debug!(rows = enriched.height(), columns = enriched.width(), "derived features");
    Ok(enriched)
}

/// Build the final table from parsed sources.
///
/// # Errors
///
/// Returns an error if any stage fails.
pub fn build_dataset(sources: &Sources, engine: &FeatureEngine) -> Result<DataFrame> {
    derive_features(merge_sources(sources)?, engine)
}

/// Runs the full build for one configuration.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    engine: FeatureEngine,
}

impl Pipeline {
    /// Create a pipeline with the standard feature engine.
    pub fn new(config: PipelineConfig) -> Self {
        let engine = FeatureEngine::new(&config.features);
        Self { config, engine }
    }

    /// The pipeline configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the three configured sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or malformed.
    pub fn load(&self) -> Result<Sources> {
        Ok(Sources {
            sales: load_sales(&self.config.sales_path)?,
            search: load_search(&self.config.search_path)?,
            economic: load_economic(&self.config.economic_path)?,
        })
    }

    /// Run every stage and write the output file.
    ///
    /// # Errors
    ///
    /// Returns the first stage error. Nothing is written unless every stage succeeds.
    pub fn run(&self) -> Result<PipelineOutput> {
        self.run_with_progress(|_| {})
    }

    /// Run every stage, calling `on_stage` as each one starts.
    ///
    /// # Errors
    ///
    /// Returns the first stage error. Nothing is written unless every stage succeeds.
    pub fn run_with_progress<F>(&self, mut on_stage: F) -> Result<PipelineOutput>
    where
        F: FnMut(Stage),
    {
        on_stage(Stage::Load);
        let sources = self.load()?;

        on_stage(Stage::Merge);
        let merged = merge_sources(&sources)?;

        on_stage(Stage::Features);
        let enriched = derive_features(merged, &self.engine)?;
        let facts = MonthlyFact::from_frame(&enriched)?;

        on_stage(Stage::Export);
        let dataset = MonthlyDataset::with_missing_token(facts, self.config.missing_token.as_str());
        dataset.export_to_file(&self.config.output_path, self.config.format)?;
        let summary = DatasetSummary::from_facts(&dataset.facts);
        tracing::info!(%summary, "dataset build complete");

        Ok(PipelineOutput {
            path: self.config.output_path.clone(),
            dataset,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn sources() -> Sources {
        Sources {
            sales: vec![
                SalesRecord::new(date(1, 5), "North", "Retail", Some(60.0)),
                SalesRecord::new(date(1, 20), "North", "Retail", Some(40.0)),
                SalesRecord::new(date(2, 3), "North", "Retail", Some(200.0)),
                SalesRecord::new(date(2, 9), "South", "Online", Some(80.0)),
            ],
            search: vec![
                SearchIndexRecord::new(date(1, 7), Some(10.0)),
                SearchIndexRecord::new(date(2, 7), Some(20.0)),
            ],
            economic: vec![EconomicRecord::new(date(1, 31), Some(1.0), Some(2.0))],
        }
    }

    #[test]
    fn test_stage_order() {
        let descriptions: Vec<&str> = Stage::ALL.iter().map(Stage::description).collect();
        assert_eq!(descriptions.len(), 4);
        assert_eq!(Stage::Load.to_string(), "Loading source files...");
    }

    #[test]
    fn test_merge_sources() {
        let merged = merge_sources(&sources()).unwrap();
        assert_eq!(merged.height(), 3);

        let revenue: Vec<Option<f64>> = merged.column("revenue").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(revenue, vec![Some(100.0), Some(200.0), Some(80.0)]);

        // February rows carry January's indicators forward.
        let gdp: Vec<Option<f64>> = merged.column("gdp_growth").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(gdp, vec![Some(1.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_build_dataset_columns() {
        let out = build_dataset(&sources(), &FeatureEngine::default()).unwrap();
        let names: Vec<String> = out.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, OUTPUT_COLUMNS.map(String::from).to_vec());
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_empty_sales() {
        let sources = Sources {
            sales: Vec::new(),
            ..sources()
        };
        let out = build_dataset(&sources, &FeatureEngine::default()).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.width(), OUTPUT_COLUMNS.len());
    }
}
