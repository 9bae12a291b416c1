//! Calendar Features
//!
//! Year, month number, quarter, a month-end flag and a season label, all read
//! from the row's date column.
//!
//! The merged table is keyed by month-start dates, so `is_month_end` is false
//! for every row. The flag is kept as-is for downstream consumers of the schema.

use crate::error::FeatureError;
use crate::registry::FeatureCategory;
use crate::traits::{ConfiguredFeature, Feature};
use almanac_data::columns::DATE;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Season of the year, in the five-season grouping used for the regional calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March
    Spring,
    /// April, May, June
    Summer,
    /// July, August, September
    Monsoon,
    /// October, November
    Autumn,
}

impl Season {
    /// Season for a month number (1-12). Returns `None` outside that range.
    pub const fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Winter),
            3 => Some(Self::Spring),
            4..=6 => Some(Self::Summer),
            7..=9 => Some(Self::Monsoon),
            10 | 11 => Some(Self::Autumn),
            _ => None,
        }
    }

    /// Label written to the output.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Monsoon => "Monsoon",
            Self::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map an integer month expression to its season label (null outside 1-12).
pub fn season_expr(month: Expr) -> Expr {
    (1..=12u32)
        .rev()
        .filter_map(|m| Season::from_month(m).map(|season| (m, season)))
        .fold(lit(NULL).cast(DataType::String), |otherwise, (m, season)| {
            when(month.clone().eq(lit(m as i32)))
                .then(lit(season.label()))
                .otherwise(otherwise)
        })
}

/// Configuration for the calendar features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Date column to read (default: "date")
    pub date_column: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            date_column: DATE.to_string(),
        }
    }
}

/// Calendar features derived from the month-start date
#[derive(Debug)]
pub struct CalendarFeature {
    config: CalendarConfig,
}

impl Feature for CalendarFeature {
    fn name(&self) -> &str {
        "calendar"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Calendar
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.date_column.as_str()]
    }

    fn output_columns(&self) -> Vec<String> {
        ["year", "month", "quarter", "is_month_end", "season"]
            .map(String::from)
            .to_vec()
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame, FeatureError> {
        let date = col(self.config.date_column.as_str());

        // A date is the last of its month when the next day is the 1st.
        let next_day = (date.clone().cast(DataType::Int32) + lit(1)).cast(DataType::Date);

        let result = data
            .with_columns([
                date.clone().dt().year().cast(DataType::Int32).alias("year"),
                date.clone().dt().month().cast(DataType::Int32).alias("month"),
                date.dt().quarter().cast(DataType::Int32).alias("quarter"),
                next_day.dt().day().eq(lit(1)).alias("is_month_end"),
            ])
            .with_columns([season_expr(col("month")).alias("season")]);

        Ok(result)
    }
}

impl ConfiguredFeature for CalendarFeature {
    type Config = CalendarConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for CalendarFeature {
    fn default() -> Self {
        Self::with_config(CalendarConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Season::Winter)]
    #[case(2, Season::Winter)]
    #[case(3, Season::Spring)]
    #[case(4, Season::Summer)]
    #[case(6, Season::Summer)]
    #[case(7, Season::Monsoon)]
    #[case(9, Season::Monsoon)]
    #[case(10, Season::Autumn)]
    #[case(11, Season::Autumn)]
    #[case(12, Season::Winter)]
    fn test_season_from_month(#[case] month: u32, #[case] expected: Season) {
        assert_eq!(Season::from_month(month), Some(expected));
    }

    #[test]
    fn test_season_out_of_range() {
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn test_season_expr_matches_from_month() {
        let df = df!("month" => (0..=13i32).collect::<Vec<_>>()).unwrap();
        let out = df
            .lazy()
            .select([season_expr(col("month")).alias("season")])
            .collect()
            .unwrap();
        let labels: Vec<Option<String>> = out
            .column("season")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|s| s.map(str::to_string))
            .collect();

        let expected: Vec<Option<String>> = (0..=13u32)
            .map(|m| Season::from_month(m).map(|s| s.label().to_string()))
            .collect();
        assert_eq!(labels, expected);
        assert_eq!(labels[0], None);
        assert_eq!(labels[12].as_deref(), Some("Winter"));
    }

    #[test]
    fn test_feature_name() {
        let feature = CalendarFeature::default();
        assert_eq!(feature.name(), "calendar");
        assert_eq!(feature.category(), FeatureCategory::Calendar);
        assert_eq!(feature.required_columns(), vec!["date"]);
        assert_eq!(feature.output_columns().len(), 5);
    }

    #[test]
    fn test_compute_calendar_columns() {
        let days = Series::new("date".into(), [19_723i32, 19_783, 19_875, 20_088])
            .cast(&DataType::Date)
            .unwrap();
        // 2024-01-01, 2024-03-01, 2024-06-01, 2024-12-31
        let df = DataFrame::new(vec![days.into()]).unwrap();

        let out = CalendarFeature::default()
            .compute(df.lazy())
            .unwrap()
            .collect()
            .unwrap();

        let ints = |name: &str| -> Vec<i32> {
            out.column(name).unwrap().i32().unwrap().into_no_null_iter().collect()
        };
        assert_eq!(ints("year"), vec![2024, 2024, 2024, 2024]);
        assert_eq!(ints("month"), vec![1, 3, 6, 12]);
        assert_eq!(ints("quarter"), vec![1, 1, 2, 4]);

        let month_end: Vec<bool> = out
            .column("is_month_end")
            .unwrap()
            .bool()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(month_end, vec![false, false, false, true]);

        let seasons: Vec<&str> = out
            .column("season")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(seasons, vec!["Winter", "Spring", "Summer", "Winter"]);
    }
}
