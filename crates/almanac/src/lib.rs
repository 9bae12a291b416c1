#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use almanac_data as data;
pub use almanac_features as features;
pub use almanac_output as output;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{
    Pipeline, PipelineOutput, Sources, Stage, build_dataset, derive_features, merge_sources,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
