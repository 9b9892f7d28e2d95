//! Timeseries primitives shared by the filter, the aggregator and the detectors.
//!
//! A series is a plain slice of [`Sample`]s in ascending timestamp order.
//! Nothing in this crate mutates a caller's series.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single `(timestamp, value)` datapoint. Timestamps are unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

/// An owned series, ascending by timestamp. Duplicate timestamps are allowed.
pub type Timeseries = Vec<Sample>;

/// Value of the most recent sample.
pub fn last_value(series: &[Sample]) -> Option<f64> {
    series.last().map(|s| s.value)
}

/// Values whose timestamp falls in `(end - span, end]`, in series order.
pub fn window_values(series: &[Sample], end: i64, span: i64) -> Vec<f64> {
    let start = end.saturating_sub(span);
    series
        .iter()
        .filter(|s| s.timestamp > start && s.timestamp <= end)
        .map(|s| s.value)
        .collect()
}

/// Number of distinct values. `-0.0` and `0.0` count as the same value.
pub fn distinct_values(values: impl IntoIterator<Item = f64>) -> usize {
    values
        .into_iter()
        .map(|v| if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() })
        .collect::<HashSet<u64>>()
        .len()
}

/// Average of the last three values, trading sensitivity for less noise
/// than the last value alone. Series shorter than three fall back to the
/// last value.
pub fn tail_average(series: &[Sample]) -> Option<f64> {
    match series {
        [] => None,
        [.., a, b, c] => Some((a.value + b.value + c.value) / 3.0),
        [.., last] => Some(last.value),
    }
}

#[cfg(test)]
pub(crate) fn series_from_values(start: i64, step: i64, values: &[f64]) -> Timeseries {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Sample::new(start + step * i as i64, *v))
        .collect()
}
