//! The boundary engine: filter → aggregate → detector ensemble → verdict.
//!
//! Filter-stage rejections are returned to the caller. Everything after the
//! filter is fail-open: aggregation failures degrade to an empty series and
//! detector failures to a non-anomalous verdict, so one bad metric never
//! stops the evaluation of the others.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::aggregate::aggregate;
use crate::error::{BoundaryResult, DetectorError, Rejection};
use crate::filter::SeriesFilter;
use crate::registry::ResolvedMetric;
use crate::series::Sample;
use crate::settings::BoundarySettings;
use crate::verdict::Verdict;

/// Series shorter than this (after aggregation) are not handed to detectors.
pub const MIN_DETECTION_SAMPLES: usize = 10;

/// Stateless evaluator. Share it behind an `Arc` across workers.
#[derive(Clone, Debug, Default)]
pub struct BoundaryEngine {
    settings: BoundarySettings,
}

impl BoundaryEngine {
    pub fn new(settings: BoundarySettings) -> BoundaryResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &BoundarySettings {
        &self.settings
    }

    /// Decide whether the last datapoint of `series` is anomalous.
    ///
    /// `now` is the evaluation time in unix seconds, used for the staleness
    /// check.
    pub fn evaluate(
        &self,
        series: &[Sample],
        metric: &ResolvedMetric,
        now: i64,
    ) -> Result<Verdict, Rejection> {
        let config = metric.config();
        let verbose = self.settings.debug;
        if verbose {
            debug!(metric = %config.name, algorithm = %config.algorithm_name, "evaluating");
        }

        if let Err(rejection) = SeriesFilter::new(&self.settings).check(series, now) {
            if verbose {
                debug!(
                    metric = %config.name,
                    algorithm = %config.algorithm_name,
                    reason = %rejection,
                    "series rejected"
                );
            }
            return Err(rejection);
        }

        let aggregated;
        let series = if config.autoaggregate {
            if verbose {
                debug!(
                    metric = %config.name,
                    bucket_seconds = config.autoaggregate_bucket_seconds,
                    "auto aggregating"
                );
            }
            aggregated = match aggregate(series, config.autoaggregate_bucket_seconds) {
                Ok(buckets) => buckets,
                Err(e) => {
                    warn!(metric = %config.name, error = %e, "auto aggregation failed");
                    Vec::new()
                }
            };
            aggregated.as_slice()
        } else {
            series
        };

        let Some(last) = series.last().filter(|_| series.len() >= MIN_DETECTION_SAMPLES) else {
            if verbose {
                debug!(
                    metric = %config.name,
                    len = series.len(),
                    "series too short for detection"
                );
            }
            return Ok(Verdict::inconclusive(config));
        };

        let ensemble = match self.run_ensemble(series, metric) {
            Ok(ensemble) => ensemble,
            Err(e) => {
                error!(
                    metric = %config.name,
                    algorithm = %config.algorithm_name,
                    error = %e,
                    "detector failed, treating as not anomalous"
                );
                return Ok(Verdict::inconclusive(config));
            }
        };

        let verdict = Verdict::from_ensemble(ensemble, last.value, config);
        if verbose {
            info!(
                metric = %config.name,
                algorithm = %config.algorithm_name,
                anomalous = verdict.is_anomalous,
                value = verdict.last_value,
                expiration_time = config.expiration_time,
                min_average = config.min_average,
                min_average_seconds = config.min_average_seconds,
                trigger = config.trigger_value,
                alert_threshold = config.alert_threshold,
                alerters = ?config.alerters,
                "evaluated"
            );
        }
        Ok(verdict)
    }

    /// [`Self::evaluate`] at the current wall-clock time.
    pub fn evaluate_now(
        &self,
        series: &[Sample],
        metric: &ResolvedMetric,
    ) -> Result<Verdict, Rejection> {
        self.evaluate(series, metric, Utc::now().timestamp())
    }

    /// Evaluate a batch of metrics, one result per input, in order.
    pub fn evaluate_all<'a, I>(&self, batch: I, now: i64) -> Vec<Result<Verdict, Rejection>>
    where
        I: IntoIterator<Item = (&'a [Sample], &'a ResolvedMetric)>,
    {
        batch
            .into_iter()
            .map(|(series, metric)| self.evaluate(series, metric, now))
            .collect()
    }

    fn run_ensemble(
        &self,
        series: &[Sample],
        metric: &ResolvedMetric,
    ) -> Result<Vec<bool>, DetectorError> {
        let mut params = metric.config().detector_params();
        params.debug = self.settings.debug;
        Ok(vec![metric.detector().detect(series, &params)?])
    }
}
