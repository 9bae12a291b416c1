#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod fact;
pub mod summary;

pub use export::{DEFAULT_MISSING_TOKEN, ExportError, ExportFormat, Exporter, MonthlyDataset};
pub use fact::{MonthlyFact, OUTPUT_COLUMNS, format_float};
pub use summary::{ColumnCoverage, DatasetSummary};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
