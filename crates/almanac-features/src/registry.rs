//! Feature Registry
//!
//! Static description of every derived column, in output order.

use std::collections::HashMap;
use std::fmt;

/// Feature categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCategory {
    /// Calendar attributes of the month-start date
    Calendar,
    /// Values from earlier rows
    Lag,
    /// Trailing moving averages
    Rolling,
    /// Min-max normalization
    Scaling,
    /// Percentile clipping
    Outlier,
}

impl FeatureCategory {
    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Lag => "lag",
            Self::Rolling => "rolling",
            Self::Scaling => "scaling",
            Self::Outlier => "outlier",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derived column metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Output column name (unique identifier)
    pub name: &'static str,
    /// Feature category
    pub category: FeatureCategory,
    /// Brief description of the column
    pub description: &'static str,
    /// Columns the value is computed from
    pub required_columns: &'static [&'static str],
}

/// Get all derived columns, in output order
pub fn available_features() -> Vec<FeatureInfo> {
    vec![
        // Calendar
        FeatureInfo {
            name: "year",
            category: FeatureCategory::Calendar,
            description: "Calendar year of the month",
            required_columns: &["date"],
        },
        FeatureInfo {
            name: "month",
            category: FeatureCategory::Calendar,
            description: "Month number (1-12)",
            required_columns: &["date"],
        },
        FeatureInfo {
            name: "quarter",
            category: FeatureCategory::Calendar,
            description: "Calendar quarter (1-4)",
            required_columns: &["date"],
        },
        FeatureInfo {
            name: "is_month_end",
            category: FeatureCategory::Calendar,
            description: "Whether the row date is the last day of its month",
            required_columns: &["date"],
        },
        FeatureInfo {
            name: "season",
            category: FeatureCategory::Calendar,
            description: "Season label (Winter, Spring, Summer, Monsoon, Autumn)",
            required_columns: &["date"],
        },
        // Lags
        FeatureInfo {
            name: "rev_lag_1",
            category: FeatureCategory::Lag,
            description: "Revenue one period earlier within region/segment",
            required_columns: &["revenue", "region", "customer_segment"],
        },
        FeatureInfo {
            name: "rev_lag_3",
            category: FeatureCategory::Lag,
            description: "Revenue three periods earlier within region/segment",
            required_columns: &["revenue", "region", "customer_segment"],
        },
        FeatureInfo {
            name: "gdp_lag_1",
            category: FeatureCategory::Lag,
            description: "GDP growth of the previous row",
            required_columns: &["gdp_growth"],
        },
        FeatureInfo {
            name: "infl_lag_1",
            category: FeatureCategory::Lag,
            description: "Inflation rate of the previous row",
            required_columns: &["inflation_rate"],
        },
        // Rolling
        FeatureInfo {
            name: "rev_roll_3",
            category: FeatureCategory::Rolling,
            description: "3-period trailing mean revenue within region/segment",
            required_columns: &["revenue", "region", "customer_segment"],
        },
        FeatureInfo {
            name: "rev_roll_6",
            category: FeatureCategory::Rolling,
            description: "6-period trailing mean revenue within region/segment",
            required_columns: &["revenue", "region", "customer_segment"],
        },
        FeatureInfo {
            name: "trend_roll_6",
            category: FeatureCategory::Rolling,
            description: "6-row trailing mean search index",
            required_columns: &["search_index"],
        },
        // Scaling
        FeatureInfo {
            name: "revenue_norm",
            category: FeatureCategory::Scaling,
            description: "Revenue min-max scaled to [0, 1]",
            required_columns: &["revenue"],
        },
        FeatureInfo {
            name: "search_norm",
            category: FeatureCategory::Scaling,
            description: "Search index min-max scaled to [0, 1]",
            required_columns: &["search_index"],
        },
        // Outliers
        FeatureInfo {
            name: "revenue_winsorized",
            category: FeatureCategory::Outlier,
            description: "Revenue clipped to its 1st-99th percentile range",
            required_columns: &["revenue"],
        },
    ]
}

/// Get derived columns grouped by category
pub fn features_by_category() -> HashMap<FeatureCategory, Vec<FeatureInfo>> {
    let mut map: HashMap<FeatureCategory, Vec<FeatureInfo>> = HashMap::new();
    for info in available_features() {
        map.entry(info.category).or_default().push(info);
    }
    map
}

/// Get info for a specific derived column by name
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    available_features().into_iter().find(|f| f.name == name)
}
