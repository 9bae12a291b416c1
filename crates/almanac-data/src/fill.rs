//! Gap filling for merge-induced nulls.
//!
//! Applied once, to the fully merged table already sorted by date. Gaps are
//! filled positionally along the row order of the whole table, not per month
//! and not per partition.

use crate::columns::{GDP_GROWTH, INFLATION_RATE, SEARCH_INDEX};
use polars::prelude::*;

/// Strategy used to fill missing values in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMethod {
    /// Linear interpolation between the nearest known neighbours. Leading and
    /// trailing gaps without a bounding value stay missing.
    Linear,
    /// Carry the most recent known value forward. Leading gaps stay missing.
    Forward,
}

impl FillMethod {
    /// Fill expression for `column`, keeping the column name.
    pub fn expr(self, column: &str) -> Expr {
        match self {
            Self::Linear => col(column).interpolate(InterpolationMethod::Linear),
            Self::Forward => col(column).fill_null_with_strategy(FillNullStrategy::Forward(None)),
        }
    }
}

/// Per-column fill policy for the merged table.
#[derive(Debug, Clone, PartialEq)]
pub struct GapFillPolicy {
    /// Columns to fill, in application order.
    pub columns: Vec<(String, FillMethod)>,
}

impl Default for GapFillPolicy {
    fn default() -> Self {
        Self {
            columns: vec![
                (SEARCH_INDEX.to_string(), FillMethod::Linear),
                (GDP_GROWTH.to_string(), FillMethod::Forward),
                (INFLATION_RATE.to_string(), FillMethod::Forward),
            ],
        }
    }
}

/// Fill gaps in `frame` according to `policy`, replacing each listed column.
pub fn fill_gaps(frame: LazyFrame, policy: &GapFillPolicy) -> LazyFrame {
    let fills: Vec<Expr> = policy
        .columns
        .iter()
        .map(|(name, method)| {
            tracing::debug!(column = %name, ?method, "filling gaps");
            method.expr(name)
        })
        .collect();
    frame.with_columns(fills)
}
