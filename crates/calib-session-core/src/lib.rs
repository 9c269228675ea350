//! Core building blocks of an interactive camera calibration session.
//!
//! Everything here is pure and I/O-free:
//! - [`extract_features`] reduces a target detection to a normalized
//!   [`FeatureVector`] (centroid x, centroid y, horizontal size),
//! - [`CoverageTracker`] keeps the running min/max envelope and classifies
//!   observations by the envelope edges they touch,
//! - [`SampleStore`] keeps one exemplar frame per [`NoveltyKey`],
//! - [`SampleCollector`] ties the two together.
//!
//! ```
//! use calib_session_core::{FeatureVector, SampleCollector};
//!
//! let mut collector = SampleCollector::default();
//! collector.observe(FeatureVector::new(0.1, 0.1, 0.1), "frame-0");
//! collector.observe(FeatureVector::new(0.9, 0.1, 0.1), "frame-1");
//! collector.observe(FeatureVector::new(0.5, 0.9, 0.3), "frame-2");
//! assert_eq!(collector.len(), 3);
//! ```

mod collector;
mod coverage;
mod feature;
mod image;
mod logger;
mod params;
mod store;

pub use collector::{Observation, SampleCollector};
pub use coverage::{
    AxisRange, CoverageSummary, CoverageTracker, EdgeMembership, Envelope, NoveltyKey,
    DEFAULT_TOLERANCE,
};
pub use feature::{extract_features, ExtractError, FeatureVector, AXIS_LABELS, FEATURE_DIMS};
pub use crate::image::{GrayImage, ImageSize, StereoPair};
pub use params::{CalibrationParameters, CameraParameters, StereoParameters};
pub use store::{Sample, SampleStore, SampleStoreError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};
