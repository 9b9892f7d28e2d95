//! Evaluation result handed to the alerting layer.

use serde::{Deserialize, Serialize};

use crate::metric::MetricConfig;

/// `last_value` reported when no real value was evaluated.
pub const NO_VALUE_SENTINEL: f64 = 1.0;

/// Outcome of one evaluation. Echoes the full metric configuration so the
/// caller needs no second lookup before alerting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_anomalous: bool,
    /// One entry per detector run.
    pub ensemble_results: Vec<bool>,
    pub last_value: f64,
    pub metric: MetricConfig,
}

impl Verdict {
    /// A non-anomalous verdict with no detector results.
    pub fn inconclusive(metric: &MetricConfig) -> Self {
        Self {
            is_anomalous: false,
            ensemble_results: Vec::new(),
            last_value: NO_VALUE_SENTINEL,
            metric: metric.clone(),
        }
    }

    /// Unanimous vote: anomalous only if every detector agreed.
    pub fn from_ensemble(ensemble: Vec<bool>, last_value: f64, metric: &MetricConfig) -> Self {
        Self {
            is_anomalous: !ensemble.is_empty() && ensemble.iter().all(|v| *v),
            ensemble_results: ensemble,
            last_value,
            metric: metric.clone(),
        }
    }

    pub fn metric_name(&self) -> &str {
        &self.metric.name
    }
}
