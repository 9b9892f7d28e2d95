//! Detector functions sharing one uniform signature.
//!
//! ```text
//!   (series, DetectorParams)
//!       │
//!       ├──► less_than              (last value < trigger)
//!       ├──► greater_than           (last value > trigger)
//!       └──► detect_drop_off_cliff  (recent average vs last value, guarded)
//!             │
//!             ▼
//!       Result<bool, DetectorError>
//! ```
//!
//! Every detector returns `Ok(false)` for series shorter than its declared
//! minimum and never mutates its input.

pub mod cliff;
pub mod threshold;

pub use cliff::{detect_drop_off_cliff, CLIFF_MIN_SAMPLES};
pub use threshold::{greater_than, less_than, THRESHOLD_MIN_SAMPLES};

use crate::error::DetectorError;
use crate::series::Sample;

/// Registry name of [`less_than`].
pub const LESS_THAN: &str = "less_than";

/// Registry name of [`greater_than`].
pub const GREATER_THAN: &str = "greater_than";

/// Registry name of [`detect_drop_off_cliff`].
pub const DETECT_DROP_OFF_CLIFF: &str = "detect_drop_off_cliff";

/// Per-metric parameters handed to every detector.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorParams {
    pub metric_name: String,
    pub expiration_time: i64,
    pub min_average: f64,
    pub min_average_seconds: i64,
    pub trigger: f64,
    /// Emit per-detector debug events; set from `BoundarySettings::debug`.
    pub debug: bool,
}

/// A detection algorithm.
///
/// Implemented for any `Fn(&[Sample], &DetectorParams) -> Result<bool, DetectorError>`,
/// so plain functions and closures can be registered directly.
pub trait Detector: Send + Sync {
    fn detect(&self, series: &[Sample], params: &DetectorParams) -> Result<bool, DetectorError>;
}

impl<F> Detector for F
where
    F: Fn(&[Sample], &DetectorParams) -> Result<bool, DetectorError> + Send + Sync,
{
    fn detect(&self, series: &[Sample], params: &DetectorParams) -> Result<bool, DetectorError> {
        self(series, params)
    }
}

#[cfg(test)]
pub(crate) fn params_with_trigger(trigger: f64) -> DetectorParams {
    DetectorParams {
        metric_name: "test.metric".into(),
        expiration_time: 3600,
        min_average: 0.0,
        min_average_seconds: 0,
        trigger,
        debug: false,
    }
}
