//! Pre-detection filtering of degenerate series.
//!
//! Checks run in a fixed order (too short, stale, boring) and the first
//! match wins.

use crate::error::Rejection;
use crate::series::{distinct_values, Sample};
use crate::settings::BoundarySettings;

/// Outcome of classifying a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesClass {
    Admissible,
    TooShort,
    Stale,
    Boring,
}

impl From<&Rejection> for SeriesClass {
    fn from(rejection: &Rejection) -> Self {
        match rejection {
            Rejection::TooShort { .. } => SeriesClass::TooShort,
            Rejection::Stale { .. } => SeriesClass::Stale,
            Rejection::Boring { .. } => SeriesClass::Boring,
        }
    }
}

pub struct SeriesFilter<'a> {
    settings: &'a BoundarySettings,
}

impl<'a> SeriesFilter<'a> {
    pub fn new(settings: &'a BoundarySettings) -> Self {
        Self { settings }
    }

    pub fn classify(&self, series: &[Sample], now: i64) -> SeriesClass {
        match self.check(series, now) {
            Ok(()) => SeriesClass::Admissible,
            Err(rejection) => SeriesClass::from(&rejection),
        }
    }

    /// Run the checks, returning the first condition that matches.
    ///
    /// An empty series is always too short, whatever the configured minimum.
    pub fn check(&self, series: &[Sample], now: i64) -> Result<(), Rejection> {
        let min = self.settings.min_tolerable_length;
        let len = series.len();
        let Some(last) = series.last() else {
            return Err(Rejection::TooShort { len, min });
        };
        if len < min {
            return Err(Rejection::TooShort { len, min });
        }

        let age = now.saturating_sub(last.timestamp);
        if age > self.settings.stale_period {
            return Err(Rejection::Stale {
                age,
                stale_period: self.settings.stale_period,
            });
        }

        // Exact equality, not "at most".
        let recent = &series[len.saturating_sub(self.settings.max_tolerable_boredom)..];
        let distinct = distinct_values(recent.iter().map(|s| s.value));
        if distinct == self.settings.boredom_set_size {
            return Err(Rejection::Boring { distinct });
        }

        Ok(())
    }
}
