//! Host-supplied constants for the filter stage and debug logging.

use serde::{Deserialize, Serialize};

use crate::error::{BoundaryError, BoundaryResult};

/// Default minimum number of samples a series needs to be considered.
pub const DEFAULT_MIN_TOLERABLE_LENGTH: usize = 1;

/// Default age (seconds) after which a series is stale.
pub const DEFAULT_STALE_PERIOD_SECS: i64 = 500;

/// Default number of trailing samples inspected by the boredom check.
pub const DEFAULT_MAX_TOLERABLE_BOREDOM: usize = 100;

/// Default distinct-value count that marks a series as boring.
pub const DEFAULT_BOREDOM_SET_SIZE: usize = 1;

/// Settings owned by the hosting system and passed to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundarySettings {
    /// Series shorter than this are rejected as too short.
    pub min_tolerable_length: usize,
    /// Maximum age of the last sample, in seconds.
    pub stale_period: i64,
    /// How many trailing samples the boredom check looks at.
    pub max_tolerable_boredom: usize,
    /// A recent window with exactly this many distinct values is boring.
    pub boredom_set_size: usize,
    /// Emit per-stage debug events.
    pub debug: bool,
}

impl Default for BoundarySettings {
    fn default() -> Self {
        Self {
            min_tolerable_length: DEFAULT_MIN_TOLERABLE_LENGTH,
            stale_period: DEFAULT_STALE_PERIOD_SECS,
            max_tolerable_boredom: DEFAULT_MAX_TOLERABLE_BOREDOM,
            boredom_set_size: DEFAULT_BOREDOM_SET_SIZE,
            debug: false,
        }
    }
}

impl BoundarySettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> BoundaryResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> BoundaryResult<()> {
        if self.max_tolerable_boredom == 0 {
            return Err(BoundaryError::InvalidSettings(
                "max_tolerable_boredom must be at least 1".into(),
            ));
        }
        if self.stale_period < 0 {
            return Err(BoundaryError::InvalidSettings(format!(
                "stale_period must be non-negative, got {}",
                self.stale_period
            )));
        }
        Ok(())
    }
}
