//! The monthly output row.

use crate::export::ExportError;
use almanac_data::period::from_epoch_days;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Output columns, in file order.
pub const OUTPUT_COLUMNS: [&str; 22] = [
    "date",
    "region",
    "customer_segment",
    "revenue",
    "search_index",
    "gdp_growth",
    "inflation_rate",
    "year",
    "month",
    "quarter",
    "is_month_end",
    "season",
    "rev_lag_1",
    "rev_lag_3",
    "gdp_lag_1",
    "infl_lag_1",
    "rev_roll_3",
    "rev_roll_6",
    "trend_roll_6",
    "revenue_norm",
    "search_norm",
    "revenue_winsorized",
];

/// One row of the enriched monthly dataset, keyed by (date, region, customer_segment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFact {
    /// First day of the month.
    pub date: NaiveDate,
    /// Sales region.
    pub region: String,
    /// Customer segment.
    pub customer_segment: String,
    /// Monthly revenue.
    pub revenue: Option<f64>,
    /// Monthly mean search index, gap-filled.
    pub search_index: Option<f64>,
    /// Last GDP growth reading of the month, forward-filled.
    pub gdp_growth: Option<f64>,
    /// Last inflation reading of the month, forward-filled.
    pub inflation_rate: Option<f64>,
    /// Calendar year.
    pub year: i32,
    /// Month number (1-12).
    pub month: i32,
    /// Quarter (1-4).
    pub quarter: i32,
    /// Whether `date` is the last day of its month.
    pub is_month_end: bool,
    /// Season label.
    pub season: String,
    /// Revenue one period earlier in the partition.
    pub rev_lag_1: Option<f64>,
    /// Revenue three periods earlier in the partition.
    pub rev_lag_3: Option<f64>,
    /// GDP growth of the previous row.
    pub gdp_lag_1: Option<f64>,
    /// Inflation rate of the previous row.
    pub infl_lag_1: Option<f64>,
    /// 3-period trailing mean revenue in the partition.
    pub rev_roll_3: Option<f64>,
    /// 6-period trailing mean revenue in the partition.
    pub rev_roll_6: Option<f64>,
    /// 6-row trailing mean search index.
    pub trend_roll_6: Option<f64>,
    /// Min-max scaled revenue.
    pub revenue_norm: Option<f64>,
    /// Min-max scaled search index.
    pub search_norm: Option<f64>,
    /// Revenue clipped to its 1st-99th percentile range.
    pub revenue_winsorized: Option<f64>,
}

impl MonthlyFact {
    /// Names of the optional numeric columns, in file order.
    pub const fn optional_columns() -> [&'static str; 14] {
        [
            "revenue",
            "search_index",
            "gdp_growth",
            "inflation_rate",
            "rev_lag_1",
            "rev_lag_3",
            "gdp_lag_1",
            "infl_lag_1",
            "rev_roll_3",
            "rev_roll_6",
            "trend_roll_6",
            "revenue_norm",
            "search_norm",
            "revenue_winsorized",
        ]
    }

    /// The optional numeric columns of this row, in file order.
    pub fn optional_values(&self) -> [(&'static str, Option<f64>); 14] {
        [
            ("revenue", self.revenue),
            ("search_index", self.search_index),
            ("gdp_growth", self.gdp_growth),
            ("inflation_rate", self.inflation_rate),
            ("rev_lag_1", self.rev_lag_1),
            ("rev_lag_3", self.rev_lag_3),
            ("gdp_lag_1", self.gdp_lag_1),
            ("infl_lag_1", self.infl_lag_1),
            ("rev_roll_3", self.rev_roll_3),
            ("rev_roll_6", self.rev_roll_6),
            ("trend_roll_6", self.trend_roll_6),
            ("revenue_norm", self.revenue_norm),
            ("search_norm", self.search_norm),
            ("revenue_winsorized", self.revenue_winsorized),
        ]
    }

    /// Render the row as text fields in [`OUTPUT_COLUMNS`] order, writing
    /// `missing` for absent or non-finite values.
    pub fn to_record(&self, missing: &str) -> Vec<String> {
        let num = |v: Option<f64>| {
            v.filter(|x| x.is_finite())
                .map_or_else(|| missing.to_string(), format_float)
        };
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.region.clone(),
            self.customer_segment.clone(),
            num(self.revenue),
            num(self.search_index),
            num(self.gdp_growth),
            num(self.inflation_rate),
            self.year.to_string(),
            self.month.to_string(),
            self.quarter.to_string(),
            if self.is_month_end { "True" } else { "False" }.to_string(),
            self.season.clone(),
            num(self.rev_lag_1),
            num(self.rev_lag_3),
            num(self.gdp_lag_1),
            num(self.infl_lag_1),
            num(self.rev_roll_3),
            num(self.rev_roll_6),
            num(self.trend_roll_6),
            num(self.revenue_norm),
            num(self.search_norm),
            num(self.revenue_winsorized),
        ]
    }

    /// Convert the final frame into rows.
    ///
    /// # Errors
    ///
    /// Returns an error if an output column is absent, has an unexpected type,
    /// or a key/calendar column holds a null.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, ExportError> {
        let dates = ints(df, "date")?;
        let regions = strings(df, "region")?;
        let segments = strings(df, "customer_segment")?;
        let years = ints(df, "year")?;
        let months = ints(df, "month")?;
        let quarters = ints(df, "quarter")?;
        let month_end: Vec<Option<bool>> = column(df, "is_month_end")?.bool()?.into_iter().collect();
        let seasons = strings(df, "season")?;

        let revenue = floats(df, "revenue")?;
        let search_index = floats(df, "search_index")?;
        let gdp_growth = floats(df, "gdp_growth")?;
        let inflation_rate = floats(df, "inflation_rate")?;
        let rev_lag_1 = floats(df, "rev_lag_1")?;
        let rev_lag_3 = floats(df, "rev_lag_3")?;
        let gdp_lag_1 = floats(df, "gdp_lag_1")?;
        let infl_lag_1 = floats(df, "infl_lag_1")?;
        let rev_roll_3 = floats(df, "rev_roll_3")?;
        let rev_roll_6 = floats(df, "rev_roll_6")?;
        let trend_roll_6 = floats(df, "trend_roll_6")?;
        let revenue_norm = floats(df, "revenue_norm")?;
        let search_norm = floats(df, "search_norm")?;
        let revenue_winsorized = floats(df, "revenue_winsorized")?;

        (0..df.height())
            .map(|row| {
                let required = |name: &'static str| ExportError::MissingValue { column: name, row };
                Ok(Self {
                    date: dates[row]
                        .and_then(from_epoch_days)
                        .ok_or_else(|| required("date"))?,
                    region: regions[row].clone().ok_or_else(|| required("region"))?,
                    customer_segment: segments[row]
                        .clone()
                        .ok_or_else(|| required("customer_segment"))?,
                    revenue: revenue[row],
                    search_index: search_index[row],
                    gdp_growth: gdp_growth[row],
                    inflation_rate: inflation_rate[row],
                    year: years[row].ok_or_else(|| required("year"))?,
                    month: months[row].ok_or_else(|| required("month"))?,
                    quarter: quarters[row].ok_or_else(|| required("quarter"))?,
                    is_month_end: month_end[row].ok_or_else(|| required("is_month_end"))?,
                    season: seasons[row].clone().ok_or_else(|| required("season"))?,
                    rev_lag_1: rev_lag_1[row],
                    rev_lag_3: rev_lag_3[row],
                    gdp_lag_1: gdp_lag_1[row],
                    infl_lag_1: infl_lag_1[row],
                    rev_roll_3: rev_roll_3[row],
                    rev_roll_6: rev_roll_6[row],
                    trend_roll_6: trend_roll_6[row],
                    revenue_norm: revenue_norm[row],
                    search_norm: search_norm[row],
                    revenue_winsorized: revenue_winsorized[row],
                })
            })
            .collect()
    }
}

/// Format a float the way tabular tools print float columns: integral values
/// keep one decimal place ("100.0"), others use the shortest exact form.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ExportError> {
    df.column(name)
        .map_err(|_| ExportError::MissingColumn(name.to_string()))
}

/// Float column with NaN and infinities read as missing.
fn floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ExportError> {
    let values = column(df, name)?.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

fn ints(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>, ExportError> {
    let values = column(df, name)?.cast(&DataType::Int32)?;
    Ok(values.i32()?.into_iter().collect())
}

fn strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ExportError> {
    Ok(column(df, name)?
        .str()?
        .into_iter()
        .map(|s| s.map(str::to_string))
        .collect())
}
