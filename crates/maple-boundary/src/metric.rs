//! Per-metric boundary configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::detectors::DetectorParams;
use crate::error::{BoundaryError, BoundaryResult};
use crate::registry::DetectorRegistry;

/// Configuration for one boundary metric. Immutable for the duration of an
/// evaluation and echoed back in every [`crate::Verdict`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    pub name: String,
    pub algorithm_name: String,
    /// Seconds an alert for this metric stays suppressed in the caller's cache.
    #[serde(default)]
    pub expiration_time: i64,
    #[serde(default)]
    pub min_average: f64,
    #[serde(default)]
    pub min_average_seconds: i64,
    #[serde(default)]
    pub trigger_value: f64,
    /// Consecutive anomalous verdicts the caller waits for before alerting.
    #[serde(default)]
    pub alert_threshold: u32,
    #[serde(default)]
    pub alerters: BTreeSet<String>,
    #[serde(default)]
    pub autoaggregate: bool,
    #[serde(default)]
    pub autoaggregate_bucket_seconds: i64,
}

impl MetricConfig {
    pub fn new(name: impl Into<String>, algorithm_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            algorithm_name: algorithm_name.into(),
            expiration_time: 0,
            min_average: 0.0,
            min_average_seconds: 0,
            trigger_value: 0.0,
            alert_threshold: 0,
            alerters: BTreeSet::new(),
            autoaggregate: false,
            autoaggregate_bucket_seconds: 0,
        }
    }

    pub fn from_json(json: &str) -> BoundaryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_trigger(mut self, trigger: f64) -> Self {
        self.trigger_value = trigger;
        self
    }

    pub fn with_expiration_time(mut self, seconds: i64) -> Self {
        self.expiration_time = seconds;
        self
    }

    pub fn with_min_average(mut self, min_average: f64, seconds: i64) -> Self {
        self.min_average = min_average;
        self.min_average_seconds = seconds;
        self
    }

    pub fn with_alert_threshold(mut self, threshold: u32) -> Self {
        self.alert_threshold = threshold;
        self
    }

    pub fn with_alerter(mut self, alerter: impl Into<String>) -> Self {
        self.alerters.insert(alerter.into());
        self
    }

    pub fn with_autoaggregate(mut self, bucket_seconds: i64) -> Self {
        self.autoaggregate = true;
        self.autoaggregate_bucket_seconds = bucket_seconds;
        self
    }

    /// The subset of the configuration every detector receives.
    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            metric_name: self.name.clone(),
            expiration_time: self.expiration_time,
            min_average: self.min_average,
            min_average_seconds: self.min_average_seconds,
            trigger: self.trigger_value,
            debug: false,
        }
    }

    /// Check the configuration and that its algorithm is registered.
    pub fn validate(&self, registry: &DetectorRegistry) -> BoundaryResult<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        if !registry.contains(&self.algorithm_name) {
            return Err(BoundaryError::UnknownAlgorithm {
                metric: self.name.clone(),
                algorithm: self.algorithm_name.clone(),
            });
        }
        if self.autoaggregate && self.autoaggregate_bucket_seconds <= 0 {
            return Err(invalid(
                "autoaggregate_bucket_seconds",
                format!("must be positive, got {}", self.autoaggregate_bucket_seconds),
            ));
        }
        if !self.min_average.is_finite() || self.min_average < 0.0 {
            return Err(invalid(
                "min_average",
                format!("must be a non-negative number, got {}", self.min_average),
            ));
        }
        if self.min_average_seconds < 0 {
            return Err(invalid(
                "min_average_seconds",
                format!("must be non-negative, got {}", self.min_average_seconds),
            ));
        }
        if self.expiration_time < 0 {
            return Err(invalid(
                "expiration_time",
                format!("must be non-negative, got {}", self.expiration_time),
            ));
        }
        if self.trigger_value.is_nan() {
            return Err(invalid("trigger_value", "must not be NaN"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, detail: impl Into<String>) -> BoundaryError {
    BoundaryError::InvalidConfig {
        field,
        detail: detail.into(),
    }
}
