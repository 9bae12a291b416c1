//! Dataset summary.
//!
//! Reports the shape of an exported dataset: row and partition counts, the
//! covered month range, and how many values each optional column is missing.

use crate::fact::MonthlyFact;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCoverage {
    /// Column name.
    pub column: String,

    /// Number of rows with no value.
    pub missing: usize,
}

impl ColumnCoverage {
    /// Share of rows with a value, in `[0, 1]`. Empty datasets report 0.
    pub fn coverage(&self, rows: usize) -> f64 {
        if rows == 0 {
            0.0
        } else {
            (rows - self.missing) as f64 / rows as f64
        }
    }
}

/// Summary of an enriched monthly dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of rows.
    pub rows: usize,

    /// Number of distinct (region, customer_segment) partitions.
    pub partitions: usize,

    /// Earliest month in the dataset.
    pub first_month: Option<NaiveDate>,

    /// Latest month in the dataset.
    pub last_month: Option<NaiveDate>,

    /// Missing counts for every optional column, in output order.
    pub columns: Vec<ColumnCoverage>,
}

impl DatasetSummary {
    /// Summarize a set of output rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use almanac_output::DatasetSummary;
    ///
    /// let summary = DatasetSummary::from_facts(&[]);
    /// assert_eq!(summary.rows, 0);
    /// assert!(summary.first_month.is_none());
    /// ```
    pub fn from_facts(facts: &[MonthlyFact]) -> Self {
        let partitions: BTreeSet<(&str, &str)> = facts
            .iter()
            .map(|f| (f.region.as_str(), f.customer_segment.as_str()))
            .collect();

        let mut columns: Vec<ColumnCoverage> = MonthlyFact::optional_columns()
            .iter()
            .map(|name| ColumnCoverage {
                column: (*name).to_string(),
                missing: 0,
            })
            .collect();
        for fact in facts {
            for (coverage, (_, value)) in columns.iter_mut().zip(fact.optional_values()) {
                if value.is_none() {
                    coverage.missing += 1;
                }
            }
        }

        Self {
            rows: facts.len(),
            partitions: partitions.len(),
            first_month: facts.iter().map(|f| f.date).min(),
            last_month: facts.iter().map(|f| f.date).max(),
            columns,
        }
    }

    /// Missing count for `column`, if it is an optional column.
    pub fn missing(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }

    /// Total number of missing values across all optional columns.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    /// Format the summary as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nDataset Summary\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!("  Rows:                     {}\n", self.rows));
        output.push_str(&format!("  Partitions:               {}\n", self.partitions));
        match (self.first_month, self.last_month) {
            (Some(first), Some(last)) => {
                output.push_str(&format!("  Months:                   {} to {}\n", first, last));
            }
            _ => output.push_str("  Months:                   -\n"),
        }

        output.push_str("\nMissing Values:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>12} {:>12}\n", "Column", "Missing", "Coverage"));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for column in &self.columns {
            output.push_str(&format!(
                "{:<24} {:>12} {:>11.1}%\n",
                column.column,
                column.missing,
                column.coverage(self.rows) * 100.0
            ));
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows, {} partitions, {} missing values",
            self.rows,
            self.partitions,
            self.total_missing()
        )
    }
}
