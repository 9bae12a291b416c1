#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod columns;
pub mod error;
pub mod fill;
pub mod loader;
pub mod merge;
pub mod period;
pub mod records;

pub use aggregate::{Reduction, monthly_economic, monthly_sales, monthly_search};
pub use error::{DataError, Result};
pub use fill::{FillMethod, GapFillPolicy, fill_gaps};
pub use loader::{load_economic, load_sales, load_search};
pub use merge::merge_monthly;
pub use period::month_start;
pub use records::{EconomicRecord, SalesRecord, SearchIndexRecord, Source};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
