//! Monthly aggregation of the source tables.
//!
//! Each source is collapsed to one row per month-start date using its own
//! reduction policy. Sales keep the region/segment grain and define the key
//! space of the final dataset; search and economic tables are month-only.

use crate::columns::{
    CUSTOMER_SEGMENT, DATE, GDP_GROWTH, INFLATION_RATE, MONTHLY_KEY, OBSERVED_ON, REGION, REVENUE,
    SEARCH_INDEX,
};
use crate::period::{month_start, to_epoch_days};
use crate::records::{EconomicRecord, SalesRecord, SearchIndexRecord};
use chrono::NaiveDate;
use polars::prelude::*;

/// How a value column is reduced within a monthly group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Sum of non-missing values (0 for an all-missing group)
    Sum,
    /// Arithmetic mean of non-missing values
    Mean,
    /// Last non-missing value in observation order
    Last,
}

impl Reduction {
    /// Aggregation expression for `column`, keeping the column name.
    pub fn expr(self, column: &str) -> Expr {
        match self {
            Self::Sum => col(column).sum(),
            Self::Mean => col(column).mean(),
            Self::Last => col(column).drop_nulls().last(),
        }
    }
}

/// Group `frame` by `keys` and reduce each value column with its policy.
///
/// Rows are stably ordered by observation date first so that [`Reduction::Last`]
/// picks the latest reading. The result is sorted by `keys`.
pub fn aggregate_monthly(
    frame: LazyFrame,
    keys: &[&str],
    values: &[(&str, Reduction)],
) -> LazyFrame {
    let group_keys: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let aggs: Vec<Expr> = values.iter().map(|(c, r)| r.expr(c)).collect();

    frame
        .sort(
            [OBSERVED_ON],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .group_by(group_keys)
        .agg(aggs)
        .sort(keys.to_vec(), SortMultipleOptions::default())
}

fn date_column(name: &str, dates: impl Iterator<Item = NaiveDate>) -> PolarsResult<Column> {
    let days: Vec<i32> = dates.map(to_epoch_days).collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?.into())
}

/// Raw sales frame: observed_on, date (month start), region, customer_segment, revenue.
pub fn sales_frame(records: &[SalesRecord]) -> PolarsResult<DataFrame> {
    let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
    let segments: Vec<&str> = records.iter().map(|r| r.customer_segment.as_str()).collect();
    let revenue: Vec<Option<f64>> = records.iter().map(|r| r.revenue).collect();

    DataFrame::new(vec![
        date_column(OBSERVED_ON, records.iter().map(|r| r.date))?,
        date_column(DATE, records.iter().map(|r| month_start(r.date)))?,
        Series::new(REGION.into(), regions).into(),
        Series::new(CUSTOMER_SEGMENT.into(), segments).into(),
        Series::new(REVENUE.into(), revenue).into(),
    ])
}

/// Raw search frame: observed_on, date (month start), search_index.
pub fn search_frame(records: &[SearchIndexRecord]) -> PolarsResult<DataFrame> {
    let index: Vec<Option<f64>> = records.iter().map(|r| r.search_index).collect();

    DataFrame::new(vec![
        date_column(OBSERVED_ON, records.iter().map(|r| r.date))?,
        date_column(DATE, records.iter().map(|r| month_start(r.date)))?,
        Series::new(SEARCH_INDEX.into(), index).into(),
    ])
}

/// Raw economic frame: observed_on, date (month start), gdp_growth, inflation_rate.
pub fn economic_frame(records: &[EconomicRecord]) -> PolarsResult<DataFrame> {
    let gdp: Vec<Option<f64>> = records.iter().map(|r| r.gdp_growth).collect();
    let inflation: Vec<Option<f64>> = records.iter().map(|r| r.inflation_rate).collect();

    DataFrame::new(vec![
        date_column(OBSERVED_ON, records.iter().map(|r| r.date))?,
        date_column(DATE, records.iter().map(|r| month_start(r.date)))?,
        Series::new(GDP_GROWTH.into(), gdp).into(),
        Series::new(INFLATION_RATE.into(), inflation).into(),
    ])
}

/// Monthly sales: one row per (date, region, customer_segment), revenue summed.
pub fn monthly_sales(records: &[SalesRecord]) -> PolarsResult<LazyFrame> {
    let frame = sales_frame(records)?.lazy();
    tracing::debug!(rows = records.len(), "aggregating sales by month, region and segment");
    Ok(aggregate_monthly(
        frame,
        &MONTHLY_KEY,
        &[(REVENUE, Reduction::Sum)],
    ))
}

/// Monthly search interest: one row per month, index averaged.
pub fn monthly_search(records: &[SearchIndexRecord]) -> PolarsResult<LazyFrame> {
    let frame = search_frame(records)?.lazy();
    tracing::debug!(rows = records.len(), "aggregating search index by month");
    Ok(aggregate_monthly(
        frame,
        &[DATE],
        &[(SEARCH_INDEX, Reduction::Mean)],
    ))
}

/// Monthly economic indicators: one row per month, last reading of each indicator.
pub fn monthly_economic(records: &[EconomicRecord]) -> PolarsResult<LazyFrame> {
    let frame = economic_frame(records)?.lazy();
    tracing::debug!(rows = records.len(), "aggregating economic indicators by month");
    Ok(aggregate_monthly(
        frame,
        &[DATE],
        &[
            (GDP_GROWTH, Reduction::Last),
            (INFLATION_RATE, Reduction::Last),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::from_epoch_days;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(df: &DataFrame) -> Vec<NaiveDate> {
        let days = df.column(DATE).unwrap().cast(&DataType::Int32).unwrap();
        days.i32()
            .unwrap()
            .into_no_null_iter()
            .map(|d| from_epoch_days(d).unwrap())
            .collect()
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_sales_sum_per_group() {
        let records = vec![
            SalesRecord::new(ymd(2024, 1, 3), "North", "Retail", Some(40.0)),
            SalesRecord::new(ymd(2024, 1, 28), "North", "Retail", Some(60.0)),
            SalesRecord::new(ymd(2024, 1, 10), "South", "Retail", Some(5.0)),
            SalesRecord::new(ymd(2024, 2, 1), "North", "Retail", Some(200.0)),
            SalesRecord::new(ymd(2024, 2, 14), "North", "Corporate", None),
        ];
        let df = monthly_sales(&records).unwrap().collect().unwrap();

        assert_eq!(df.height(), 4);
        assert_eq!(
            dates(&df),
            vec![ymd(2024, 1, 1), ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 2, 1)]
        );
        let regions: Vec<_> = df.column(REGION).unwrap().str().unwrap().into_no_null_iter().collect();
        let segments: Vec<_> = df
            .column(CUSTOMER_SEGMENT)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(regions, vec!["North", "South", "North", "North"]);
        assert_eq!(segments, vec!["Retail", "Retail", "Corporate", "Retail"]);
        assert_eq!(
            floats(&df, REVENUE),
            vec![Some(100.0), Some(5.0), Some(0.0), Some(200.0)]
        );
    }

    #[test]
    fn test_sales_total_is_preserved() {
        let records: Vec<_> = (1..=60)
            .map(|i| {
                let region = if i % 2 == 0 { "East" } else { "West" };
                let segment = if i % 3 == 0 { "Retail" } else { "Online" };
                SalesRecord::new(ymd(2023, (i % 12) as u32 + 1, (i % 28) as u32 + 1), region, segment, Some(i as f64))
            })
            .collect();
        let df = monthly_sales(&records).unwrap().collect().unwrap();

        let total: f64 = floats(&df, REVENUE).into_iter().flatten().sum();
        assert_relative_eq!(total, (1..=60).sum::<i32>() as f64);

        let keys = df.select(MONTHLY_KEY).unwrap();
        assert!(!keys.is_duplicated().unwrap().any());
    }

    #[test]
    fn test_search_mean() {
        let records = vec![
            SearchIndexRecord::new(ymd(2024, 1, 7), Some(10.0)),
            SearchIndexRecord::new(ymd(2024, 1, 14), Some(20.0)),
            SearchIndexRecord::new(ymd(2024, 1, 21), None),
            SearchIndexRecord::new(ymd(2024, 3, 3), Some(30.0)),
        ];
        let df = monthly_search(&records).unwrap().collect().unwrap();
        assert_eq!(dates(&df), vec![ymd(2024, 1, 1), ymd(2024, 3, 1)]);
        assert_eq!(floats(&df, SEARCH_INDEX), vec![Some(15.0), Some(30.0)]);
    }

    #[test]
    fn test_economic_last_reading_by_observation_date() {
        let records = vec![
            EconomicRecord::new(ymd(2024, 1, 31), Some(1.3), Some(4.0)),
            EconomicRecord::new(ymd(2024, 1, 1), Some(1.0), Some(5.0)),
            EconomicRecord::new(ymd(2024, 2, 1), Some(1.5), Some(3.0)),
            EconomicRecord::new(ymd(2024, 2, 15), None, Some(3.5)),
        ];
        let df = monthly_economic(&records).unwrap().collect().unwrap();
        assert_eq!(dates(&df), vec![ymd(2024, 1, 1), ymd(2024, 2, 1)]);
        assert_eq!(floats(&df, GDP_GROWTH), vec![Some(1.3), Some(1.5)]);
        assert_eq!(floats(&df, INFLATION_RATE), vec![Some(4.0), Some(3.5)]);
    }

    #[test]
    fn test_empty_source_yields_empty_frame() {
        let df = monthly_search(&[]).unwrap().collect().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.column(SEARCH_INDEX).unwrap().dtype(), &DataType::Float64);
    }
}
