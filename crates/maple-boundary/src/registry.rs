//! Detector registry: name → detector, resolved at configuration time.
//!
//! The registry is built once at startup and only read afterwards, so it
//! can be shared freely across threads. Metrics are resolved against it
//! before evaluation; an unknown algorithm name never reaches the engine.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::detectors::{
    detect_drop_off_cliff, greater_than, less_than, Detector, DETECT_DROP_OFF_CLIFF,
    GREATER_THAN, LESS_THAN,
};
use crate::error::{BoundaryError, BoundaryResult};
use crate::metric::MetricConfig;

/// Registry of named detection algorithms.
#[derive(Clone, Default)]
pub struct DetectorRegistry {
    detectors: BTreeMap<String, Arc<dyn Detector>>,
}

impl DetectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in detectors.
    pub fn with_builtins() -> Self {
        let mut detectors: BTreeMap<String, Arc<dyn Detector>> = BTreeMap::new();
        detectors.insert(LESS_THAN.into(), Arc::new(less_than));
        detectors.insert(GREATER_THAN.into(), Arc::new(greater_than));
        detectors.insert(DETECT_DROP_OFF_CLIFF.into(), Arc::new(detect_drop_off_cliff));
        Self { detectors }
    }

    /// Register a detector under a new name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        detector: impl Detector + 'static,
    ) -> BoundaryResult<()> {
        let name = name.into();
        if self.detectors.contains_key(&name) {
            return Err(BoundaryError::DuplicateAlgorithm(name));
        }
        tracing::info!(algorithm = %name, "detector registered");
        self.detectors.insert(name, Arc::new(detector));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Detector>> {
        self.detectors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.detectors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.detectors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Validate `config` and bind it to its detector.
    pub fn resolve(&self, config: MetricConfig) -> BoundaryResult<ResolvedMetric> {
        config.validate(self)?;
        let detector = self
            .get(&config.algorithm_name)
            .ok_or_else(|| BoundaryError::UnknownAlgorithm {
                metric: config.name.clone(),
                algorithm: config.algorithm_name.clone(),
            })?;
        Ok(ResolvedMetric { config, detector })
    }
}

impl fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.detectors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A validated metric bound to its detector. Only resolved metrics can be
/// evaluated.
#[derive(Clone)]
pub struct ResolvedMetric {
    config: MetricConfig,
    detector: Arc<dyn Detector>,
}

impl ResolvedMetric {
    pub fn config(&self) -> &MetricConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn detector(&self) -> &dyn Detector {
        self.detector.as_ref()
    }
}

impl fmt::Debug for ResolvedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedMetric")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::DetectorParams;
    use crate::error::DetectorError;
    use crate::series::Sample;

    fn always(_: &[Sample], _: &DetectorParams) -> Result<bool, DetectorError> {
        Ok(true)
    }

    #[test]
    fn builtins_are_registered() {
        let registry = DetectorRegistry::with_builtins();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![DETECT_DROP_OFF_CLIFF, GREATER_THAN, LESS_THAN]
        );
        assert!(registry.contains(LESS_THAN));
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn register_custom_detector() {
        let mut registry = DetectorRegistry::new();
        assert!(registry.is_empty());
        registry.register("always", always).unwrap();
        assert!(registry.contains("always"));

        let series: Vec<Sample> = vec![Sample::new(0, 1.0)];
        let params = MetricConfig::new("m", "always").detector_params();
        let detector = registry.get("always").unwrap();
        assert_eq!(detector.detect(&series, &params), Ok(true));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = DetectorRegistry::with_builtins();
        let err = registry.register(LESS_THAN, always).unwrap_err();
        assert!(matches!(err, BoundaryError::DuplicateAlgorithm(name) if name == LESS_THAN));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn resolve_binds_detector() {
        let registry = DetectorRegistry::with_builtins();
        let resolved = registry
            .resolve(MetricConfig::new("stats.requests", GREATER_THAN).with_trigger(10.0))
            .unwrap();
        assert_eq!(resolved.name(), "stats.requests");

        let series: Vec<Sample> = (0..10).map(|i| Sample::new(i, 11.0)).collect();
        let params = resolved.config().detector_params();
        assert_eq!(resolved.detector().detect(&series, &params), Ok(true));
    }

    #[test]
    fn resolve_fails_fast_on_unknown_name() {
        let registry = DetectorRegistry::with_builtins();
        let err = registry
            .resolve(MetricConfig::new("stats.requests", "histogram_bins"))
            .unwrap_err();
        assert!(matches!(err, BoundaryError::UnknownAlgorithm { .. }));
    }

    #[test]
    fn registry_debug_lists_names() {
        let registry = DetectorRegistry::with_builtins();
        assert!(format!("{:?}", registry).contains("greater_than"));
    }

    #[test]
    fn registry_and_metrics_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DetectorRegistry>();
        assert_send_sync::<ResolvedMetric>();
    }
}
