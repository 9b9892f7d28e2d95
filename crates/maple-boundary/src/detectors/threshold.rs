//! Fixed-trigger comparisons against the last datapoint.

use tracing::debug;

use super::DetectorParams;
use crate::error::DetectorError;
use crate::series::Sample;

/// Minimum series length for the threshold detectors.
pub const THRESHOLD_MIN_SAMPLES: usize = 10;

/// Anomalous if the last value is below the trigger.
pub fn less_than(series: &[Sample], params: &DetectorParams) -> Result<bool, DetectorError> {
    if series.len() < THRESHOLD_MIN_SAMPLES {
        return Ok(false);
    }
    let Some(last) = series.last() else {
        return Ok(false);
    };

    if last.value < params.trigger {
        if params.debug {
            debug!(
                metric = %params.metric_name,
                value = last.value,
                trigger = params.trigger,
                "less_than fired"
            );
        }
        return Ok(true);
    }
    Ok(false)
}

/// Anomalous if the last value is above the trigger.
pub fn greater_than(series: &[Sample], params: &DetectorParams) -> Result<bool, DetectorError> {
    if series.len() < THRESHOLD_MIN_SAMPLES {
        return Ok(false);
    }
    let Some(last) = series.last() else {
        return Ok(false);
    };

    if last.value > params.trigger {
        if params.debug {
            debug!(
                metric = %params.metric_name,
                value = last.value,
                trigger = params.trigger,
                "greater_than fired"
            );
        }
        return Ok(true);
    }
    Ok(false)
}
