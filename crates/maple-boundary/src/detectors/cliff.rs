//! Drop-off-cliff detection. EXPERIMENTAL.
//!
//! Fires when the average of the last ten datapoints is many times larger
//! than the last datapoint, unless the metric routinely visits that floor.
//! Best suited to high-rate metrics (most values above 100); lower
//! magnitudes get noisier triggers but still catch real cliffs.
//!
//! The trigger thresholds are empirically tuned and are kept exactly as
//! they are, overlaps included.

use tracing::debug;

use super::DetectorParams;
use crate::error::DetectorError;
use crate::series::{window_values, Sample};

/// Minimum series length for cliff detection.
pub const CLIFF_MIN_SAMPLES: usize = 30;

/// Divisor used in place of a last value that truncates to zero.
const ZERO_DIVISOR: f64 = 0.1;

/// A floor visited more often than this within a window is routine.
const MAX_FLOOR_VISITS: usize = 2;

/// Summary of the ten-datapoint window the trigger rules look at.
#[derive(Clone, Copy, Debug)]
struct CliffStats {
    max: f64,
    average: f64,
    sum: f64,
    /// Truncated last value, later possibly replaced by [`ZERO_DIVISOR`].
    divisor: f64,
}

#[derive(Clone, Copy)]
enum RuleAction {
    Trigger(fn(&CliffStats) -> f64),
    Divisor(f64),
}

struct TriggerRule {
    applies: fn(&CliffStats) -> bool,
    action: RuleAction,
}

/// Evaluated top to bottom; a later matching rule overrides an earlier one.
const TRIGGER_RULES: [TriggerRule; 7] = [
    TriggerRule {
        applies: |s| s.max < 101.0,
        action: RuleAction::Trigger(|_| 15.0),
    },
    TriggerRule {
        applies: |s| s.max < 20.0,
        action: RuleAction::Trigger(|s| s.average / 2.0),
    },
    TriggerRule {
        applies: |s| s.max > 100.0,
        action: RuleAction::Trigger(|_| 100.0),
    },
    TriggerRule {
        applies: |s| s.divisor == 0.0,
        action: RuleAction::Divisor(ZERO_DIVISOR),
    },
    TriggerRule {
        applies: |s| s.divisor == 1.0,
        action: RuleAction::Trigger(|_| 1.0),
    },
    TriggerRule {
        applies: |s| s.divisor == 1.0 && s.max < 10.0,
        action: RuleAction::Trigger(|_| 0.1),
    },
    TriggerRule {
        applies: |s| s.divisor == ZERO_DIVISOR && s.average < 1.0 && s.sum < 7.0,
        action: RuleAction::Trigger(|_| 7.0),
    },
];

/// Walk the rule table, returning the final trigger and the (possibly
/// substituted) divisor.
fn select_trigger(mut stats: CliffStats) -> (Option<f64>, f64) {
    let mut trigger = None;
    for rule in &TRIGGER_RULES {
        if !(rule.applies)(&stats) {
            continue;
        }
        match rule.action {
            RuleAction::Trigger(f) => trigger = Some(f(&stats)),
            RuleAction::Divisor(d) => stats.divisor = d,
        }
    }
    (trigger, stats.divisor)
}

fn count_at_or_below(values: &[f64], floor: f64) -> usize {
    values.iter().filter(|v| **v <= floor).count()
}

/// Anomalous if the ten-datapoint average is more than `trigger` times the
/// last datapoint and the metric has not been at this floor recently.
///
/// Guards, in order, each returning `false`:
/// too few samples, at most three points in the ten-point window, negative
/// values, an all-zero or flat window, more than two visits to the window
/// minimum in the ten- or twenty-point windows, and an overall average below
/// `min_average` (when configured).
pub fn detect_drop_off_cliff(
    series: &[Sample],
    params: &DetectorParams,
) -> Result<bool, DetectorError> {
    if series.len() < CLIFF_MIN_SAMPLES {
        return Ok(false);
    }
    let [.., previous, last] = series else {
        return Ok(false);
    };

    let end = last.timestamp;
    let Some(resolution) = end.checked_sub(previous.timestamp) else {
        return Ok(false);
    };

    let ten = window_values(series, end, resolution.saturating_mul(10));
    if ten.len() <= 3 {
        return Ok(false);
    }
    if let Some(value) = ten.iter().copied().find(|v| !v.is_finite()) {
        return Err(DetectorError::NonFiniteValue {
            timestamp: end,
            value,
        });
    }

    let min = ten.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ten.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // no bottom to a cliff that runs into negative values
    if min < 0.0 {
        return Ok(false);
    }
    // an all-zero window would already have fired
    if max == 0.0 || min == max {
        return Ok(false);
    }

    if count_at_or_below(&ten, min) > MAX_FLOOR_VISITS {
        return Ok(false);
    }
    let twenty = window_values(series, end, resolution.saturating_mul(20));
    if count_at_or_below(&twenty, min) > MAX_FLOOR_VISITS {
        return Ok(false);
    }

    if params.min_average > 0.0 && params.min_average_seconds > 0 {
        let recent = window_values(series, end, params.min_average_seconds);
        let average = recent.iter().sum::<f64>() / recent.len() as f64;
        if average < params.min_average {
            return Ok(false);
        }
    }

    let sum: f64 = ten.iter().sum();
    let stats = CliffStats {
        max,
        average: sum / ten.len() as f64,
        sum,
        divisor: ten[ten.len() - 1].trunc(),
    };
    let (Some(trigger), divisor) = select_trigger(stats) else {
        return Ok(false);
    };

    let ratio = stats.average / divisor;
    if ratio.trunc() > trigger {
        if params.debug {
            debug!(
                metric = %params.metric_name,
                timestamp = end,
                last = divisor,
                sum,
                average = stats.average,
                trigger,
                ratio,
                "detect_drop_off_cliff fired"
            );
        }
        return Ok(true);
    }
    Ok(false)
}
