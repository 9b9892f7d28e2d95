//! Fixed-width auto-aggregation over the last hour of a series.
//!
//! Used for metrics that carry one real value per interval but are sampled
//! more often. Buckets are built walking backward from the last timestamp;
//! each bucket is labelled with its upper boundary and holds the sum of the
//! values in `(lower, upper]`. Every bucket is exactly `bucket_seconds` wide.

use tracing::trace;

use crate::error::AggregationError;
use crate::series::{Sample, Timeseries};

/// Minimum samples required before aggregation is attempted.
pub const AGGREGATION_MIN_SAMPLES: usize = 60;

/// Length of the aggregated window, in seconds.
pub const AGGREGATION_WINDOW_SECS: i64 = 3600;

/// Sum `series` into `bucket_seconds`-wide buckets covering the hour that
/// ends at its last sample. The result is ascending by timestamp.
///
/// The input must be ascending by timestamp.
pub fn aggregate(series: &[Sample], bucket_seconds: i64) -> Result<Timeseries, AggregationError> {
    let len = series.len();
    let Some(last) = series.last().filter(|_| len >= AGGREGATION_MIN_SAMPLES) else {
        return Err(AggregationError::TooShort {
            len,
            min: AGGREGATION_MIN_SAMPLES,
        });
    };
    if bucket_seconds <= 0 {
        return Err(AggregationError::InvalidBucketWidth(bucket_seconds));
    }

    let end = last.timestamp;
    let start = end
        .checked_sub(AGGREGATION_WINDOW_SECS)
        .ok_or(AggregationError::InvalidSpan {
            end,
            expected: AGGREGATION_WINDOW_SECS,
        })?;

    let window = &series[series.partition_point(|s| s.timestamp <= start)..];
    trace!(start, end, bucket_seconds, samples = window.len(), "aggregating");

    let mut buckets = Vec::with_capacity((AGGREGATION_WINDOW_SECS / bucket_seconds) as usize);
    let mut upper = end;
    let mut upper_idx = window.len();
    // only full-width buckets; a remainder at the window start is dropped
    while let Some(lower) = upper.checked_sub(bucket_seconds).filter(|lower| *lower >= start) {
        let lower_idx = window[..upper_idx].partition_point(|s| s.timestamp <= lower);
        let sum: f64 = window[lower_idx..upper_idx].iter().map(|s| s.value).sum();
        buckets.push(Sample::new(upper, sum));
        upper = lower;
        upper_idx = lower_idx;
    }

    buckets.reverse();
    Ok(buckets)
}
