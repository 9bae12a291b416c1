#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almanac/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod engine;
pub mod error;
pub mod lag;
pub mod registry;
pub mod rolling;
pub mod scaling;
pub mod traits;
pub mod winsorize;

pub use calendar::{CalendarFeature, Season};
pub use engine::{FeatureConfig, FeatureEngine};
pub use error::FeatureError;
pub use lag::{LagConfig, LagFeature};
pub use rolling::{RollingMeanConfig, RollingMeanFeature};
pub use scaling::{MinMaxConfig, MinMaxFeature};
pub use traits::{ConfiguredFeature, Feature};
pub use winsorize::{WinsorizeConfig, WinsorizeFeature};

// Re-export registry types for convenience
pub use registry::{
    FeatureCategory, FeatureInfo, available_features, features_by_category, get_feature_info,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
