//! # maple-boundary
//!
//! Boundary evaluation core: decides whether the most recent datapoint of a
//! single metric's time-series window is anomalous.
//!
//! ## Architecture
//!
//! ```text
//!   series + ResolvedMetric + now
//!       │
//!       ▼
//!   ┌──────────────┐  TooShort / Stale / Boring
//!   │ SeriesFilter │──────────────────────────────► Err(Rejection)
//!   └──────┬───────┘
//!          │ (autoaggregate)
//!          ▼
//!   ┌──────────────┐  failure → empty series
//!   │  aggregate   │
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐  < 10 samples or detector error
//!   │   ensemble   │──────────────────────────────► Verdict::inconclusive
//!   └──────┬───────┘
//!          ▼
//!       Verdict (unanimous vote, echoes MetricConfig)
//! ```
//!
//! ## Invariants
//!
//! - Input series are ascending by timestamp and never mutated.
//! - No detector reports an anomaly on a series shorter than its minimum.
//! - Unknown algorithm names fail at resolution time, never during evaluation.
//! - Nothing after the filter stage propagates an error (fail-open).
//!
//! ## Quick Start
//!
//! ```rust
//! use maple_boundary::{
//!     BoundaryEngine, DetectorRegistry, MetricConfig, Sample, LESS_THAN,
//! };
//!
//! let registry = DetectorRegistry::with_builtins();
//! let metric = registry
//!     .resolve(MetricConfig::new("stats.requests", LESS_THAN).with_trigger(5.0))
//!     .unwrap();
//!
//! let now = 1_700_000_000;
//! let series: Vec<Sample> = (0..20)
//!     .map(|i| Sample::new(now - 60 * (19 - i), if i == 19 { 2.0 } else { 10.0 + i as f64 }))
//!     .collect();
//!
//! let verdict = BoundaryEngine::with_defaults()
//!     .evaluate(&series, &metric, now)
//!     .unwrap();
//! assert!(verdict.is_anomalous);
//! ```

#![deny(unsafe_code)]

pub mod aggregate;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod filter;
pub mod metric;
pub mod registry;
pub mod series;
pub mod settings;
pub mod verdict;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use aggregate::{aggregate, AGGREGATION_MIN_SAMPLES, AGGREGATION_WINDOW_SECS};
pub use detectors::{
    detect_drop_off_cliff, greater_than, less_than, Detector, DetectorParams,
    CLIFF_MIN_SAMPLES, DETECT_DROP_OFF_CLIFF, GREATER_THAN, LESS_THAN, THRESHOLD_MIN_SAMPLES,
};
pub use engine::{BoundaryEngine, MIN_DETECTION_SAMPLES};
pub use error::{AggregationError, BoundaryError, BoundaryResult, DetectorError, Rejection};
pub use filter::{SeriesClass, SeriesFilter};
pub use metric::MetricConfig;
pub use registry::{DetectorRegistry, ResolvedMetric};
pub use series::{tail_average, Sample, Timeseries};
pub use settings::BoundarySettings;
pub use verdict::{Verdict, NO_VALUE_SENTINEL};
