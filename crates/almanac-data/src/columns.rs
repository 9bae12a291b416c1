//! Column names shared across the pipeline.

/// Month-start date: the join and grouping key.
pub const DATE: &str = "date";
/// Original observation date, kept only until aggregation.
pub const OBSERVED_ON: &str = "observed_on";
/// Sales region.
pub const REGION: &str = "region";
/// Customer segment.
pub const CUSTOMER_SEGMENT: &str = "customer_segment";
/// Revenue (monthly sum after aggregation).
pub const REVENUE: &str = "revenue";
/// Search-interest index (monthly mean after aggregation).
pub const SEARCH_INDEX: &str = "search_index";
/// GDP growth (last reading of the month after aggregation).
pub const GDP_GROWTH: &str = "gdp_growth";
/// Inflation rate (last reading of the month after aggregation).
pub const INFLATION_RATE: &str = "inflation_rate";

/// Partition of the sales grain below the month.
pub const PARTITION: [&str; 2] = [REGION, CUSTOMER_SEGMENT];

/// Unique key of a merged monthly row.
pub const MONTHLY_KEY: [&str; 3] = [DATE, REGION, CUSTOMER_SEGMENT];

/// Columns of the merged table, in order.
pub const MERGED: [&str; 7] = [
    DATE,
    REGION,
    CUSTOMER_SEGMENT,
    REVENUE,
    SEARCH_INDEX,
    GDP_GROWTH,
    INFLATION_RATE,
];
