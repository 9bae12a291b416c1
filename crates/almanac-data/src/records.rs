//! Typed rows of the three input sources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three input sources and their fixed schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Transactional sales records
    Sales,
    /// Search-interest index
    Search,
    /// Macroeconomic indicators
    Economic,
}

impl Source {
    /// Columns that must be present in the header row, in canonical order.
    pub const fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Sales => &["date", "region", "customer_segment", "revenue"],
            Self::Search => &["date", "search_index"],
            Self::Economic => &["date", "gdp_growth", "inflation_rate"],
        }
    }

    /// Name of the column parsed as a calendar date.
    pub const fn date_column(&self) -> &'static str {
        "date"
    }

    /// Short human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Search => "search",
            Self::Economic => "economic",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single sales transaction (or pre-aggregated sales line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Observation date.
    pub date: NaiveDate,
    /// Sales region.
    pub region: String,
    /// Customer segment.
    pub customer_segment: String,
    /// Revenue amount, `None` when the field was empty.
    pub revenue: Option<f64>,
}

impl SalesRecord {
    /// Create a new sales record.
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        customer_segment: impl Into<String>,
        revenue: Option<f64>,
    ) -> Self {
        Self {
            date,
            region: region.into(),
            customer_segment: customer_segment.into(),
            revenue,
        }
    }
}

/// A single search-interest observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndexRecord {
    /// Observation date.
    pub date: NaiveDate,
    /// Search-interest index value.
    pub search_index: Option<f64>,
}

impl SearchIndexRecord {
    /// Create a new search-index record.
    pub const fn new(date: NaiveDate, search_index: Option<f64>) -> Self {
        Self { date, search_index }
    }
}

/// A single macroeconomic reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicRecord {
    /// Observation (publication) date.
    pub date: NaiveDate,
    /// GDP growth rate.
    pub gdp_growth: Option<f64>,
    /// Inflation rate.
    pub inflation_rate: Option<f64>,
}

impl EconomicRecord {
    /// Create a new economic record.
    pub const fn new(date: NaiveDate, gdp_growth: Option<f64>, inflation_rate: Option<f64>) -> Self {
        Self {
            date,
            gdp_growth,
            inflation_rate,
        }
    }
}
