//! Left-join of the monthly tables onto the sales grid.

use crate::columns::{DATE, MERGED, MONTHLY_KEY};
use polars::prelude::*;

/// Join the monthly search and economic tables onto the monthly sales table.
///
/// The sales side drives the join: every (date, region, customer_segment) row
/// survives, and month-only rows from the other two sides broadcast onto every
/// sales row sharing their month. Months missing from a side leave nulls.
/// The result is sorted ascending by date, ties ordered by region then segment.
pub fn merge_monthly(sales: LazyFrame, search: LazyFrame, economic: LazyFrame) -> LazyFrame {
    sales
        .join(
            search,
            [col(DATE)],
            [col(DATE)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            economic,
            [col(DATE)],
            [col(DATE)],
            JoinArgs::new(JoinType::Left),
        )
        .sort(
            MONTHLY_KEY,
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .select(MERGED.map(col))
}
