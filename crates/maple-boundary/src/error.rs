use thiserror::Error;

/// Filter-stage conditions that stop an evaluation before any detector runs.
///
/// These are surfaced to the caller, which decides whether to skip, log, or
/// count the metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("series too short: {len} samples (minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("series stale: last sample is {age}s old (stale period {stale_period}s)")]
    Stale { age: i64, stale_period: i64 },

    #[error("series boring: {distinct} distinct values in the recent window")]
    Boring { distinct: usize },
}

/// Failures of the auto-aggregation stage. Internal: the engine degrades
/// these to an empty series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("series too short to aggregate: {len} samples (minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("aggregation bucket width must be positive, got {0}s")]
    InvalidBucketWidth(i64),

    #[error("aggregation window of {expected}s cannot end at timestamp {end}")]
    InvalidSpan { end: i64, expected: i64 },
}

/// Failures raised inside a detector. Absorbed by the engine (fail-open).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    #[error("non-finite value {value} at timestamp {timestamp}")]
    NonFiniteValue { timestamp: i64, value: f64 },

    #[error("detector failed: {0}")]
    Failed(String),
}

/// Configuration-time errors: registry, metric and settings validation.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("unknown algorithm {algorithm:?} configured for metric {metric:?}")]
    UnknownAlgorithm { metric: String, algorithm: String },

    #[error("algorithm already registered: {0}")]
    DuplicateAlgorithm(String),

    #[error("invalid metric config: {field} -- {detail}")]
    InvalidConfig { field: &'static str, detail: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BoundaryError {
    fn from(e: serde_json::Error) -> Self {
        BoundaryError::Serialization(e.to_string())
    }
}

/// Convenience type alias for configuration-time results.
pub type BoundaryResult<T> = Result<T, BoundaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_display_messages() {
        let e = Rejection::TooShort { len: 3, min: 10 };
        assert!(e.to_string().contains("3 samples"));

        let e = Rejection::Stale {
            age: 900,
            stale_period: 500,
        };
        assert!(e.to_string().contains("900s"));
        assert!(e.to_string().contains("500s"));

        let e = Rejection::Boring { distinct: 1 };
        assert!(e.to_string().contains("1 distinct"));
    }

    #[test]
    fn aggregation_error_display() {
        let e = AggregationError::InvalidBucketWidth(0);
        assert!(e.to_string().contains("0s"));

        let e = AggregationError::TooShort { len: 12, min: 60 };
        assert!(e.to_string().contains("60"));
    }

    #[test]
    fn boundary_error_display() {
        let e = BoundaryError::UnknownAlgorithm {
            metric: "stats.requests".into(),
            algorithm: "nope".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("stats.requests"));

        let e = BoundaryError::InvalidConfig {
            field: "autoaggregate_bucket_seconds",
            detail: "must be positive".into(),
        };
        assert!(e.to_string().contains("autoaggregate_bucket_seconds"));
    }

    #[test]
    fn serde_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: BoundaryError = json_err.into();
        assert!(matches!(err, BoundaryError::Serialization(_)));
    }
}
