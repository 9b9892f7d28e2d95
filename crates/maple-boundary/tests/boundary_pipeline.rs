//! End-to-end evaluation through the public API.

use std::sync::Arc;
use std::thread;

use maple_boundary::{
    BoundaryEngine, BoundaryError, BoundarySettings, DetectorError, DetectorParams,
    DetectorRegistry, MetricConfig, Rejection, Sample, SeriesClass, SeriesFilter, Verdict,
    DETECT_DROP_OFF_CLIFF, GREATER_THAN, LESS_THAN,
};

const NOW: i64 = 1_700_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("maple_boundary=debug")
        .with_test_writer()
        .try_init();
}

/// A minute-resolution series ending at `NOW`.
fn minutes(values: &[f64]) -> Vec<Sample> {
    let start = NOW - 60 * (values.len() as i64 - 1);
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Sample::new(start + 60 * i as i64, *v))
        .collect()
}

fn request_rate(len: usize) -> Vec<f64> {
    (0..len).map(|i| 500.0 + (i % 7) as f64 * 10.0).collect()
}

#[test]
fn debug_settings_pipeline_from_json() {
    init_tracing();

    let settings = BoundarySettings::from_json(r#"{"debug": true, "stale_period": 300}"#).unwrap();
    let engine = BoundaryEngine::new(settings).unwrap();
    let registry = DetectorRegistry::with_builtins();

    let cliff = registry
        .resolve(
            MetricConfig::from_json(
                r#"{
                    "name": "nginx.requests",
                    "algorithm_name": "detect_drop_off_cliff",
                    "expiration_time": 1800,
                    "alert_threshold": 1,
                    "alerters": ["smtp", "pagerduty"]
                }"#,
            )
            .unwrap(),
        )
        .unwrap();

    let mut values = request_rate(60);
    values.push(2.0);
    let verdict = engine.evaluate(&minutes(&values), &cliff, NOW).unwrap();
    assert!(verdict.is_anomalous);
    assert_eq!(verdict.ensemble_results, vec![true]);
    assert_eq!(verdict.metric_name(), "nginx.requests");
    assert!(verdict.metric.alerters.contains("pagerduty"));

    // steady traffic is not a cliff
    let verdict = engine.evaluate(&minutes(&request_rate(61)), &cliff, NOW).unwrap();
    assert!(!verdict.is_anomalous);
}

#[test]
fn unknown_algorithm_fails_before_evaluation() {
    let registry = DetectorRegistry::with_builtins();
    let err = registry
        .resolve(MetricConfig::new("nginx.requests", "first_hour_average"))
        .unwrap_err();
    assert!(matches!(err, BoundaryError::UnknownAlgorithm { .. }));
}

#[test]
fn rejections_reach_the_caller() {
    let engine = BoundaryEngine::with_defaults();
    let metric = DetectorRegistry::with_builtins()
        .resolve(MetricConfig::new("nginx.requests", GREATER_THAN).with_trigger(0.0))
        .unwrap();

    let series = minutes(&[5.0; 30]);
    let err = engine.evaluate(&series, &metric, NOW).unwrap_err();
    assert_eq!(err, Rejection::Boring { distinct: 1 });
    assert_eq!(
        SeriesFilter::new(engine.settings()).classify(&series, NOW),
        SeriesClass::from(&err)
    );
}

#[test]
fn custom_detector_joins_the_registry() {
    let mut registry = DetectorRegistry::with_builtins();
    registry
        .register(
            "above_tail_average",
            |series: &[Sample], params: &DetectorParams| -> Result<bool, DetectorError> {
                let average = maple_boundary::tail_average(series)
                    .ok_or_else(|| DetectorError::Failed("empty series".into()))?;
                Ok(average > params.trigger)
            },
        )
        .unwrap();
    assert!(matches!(
        registry.register(DETECT_DROP_OFF_CLIFF, maple_boundary::less_than),
        Err(BoundaryError::DuplicateAlgorithm(_))
    ));

    let metric = registry
        .resolve(MetricConfig::new("nginx.requests", "above_tail_average").with_trigger(550.0))
        .unwrap();
    let verdict = BoundaryEngine::with_defaults()
        .evaluate(&minutes(&request_rate(20)), &metric, NOW)
        .unwrap();
    // tail of 20 values cycling by 7: 530, 540, 550 → 540
    assert!(!verdict.is_anomalous);
    assert_eq!(verdict.ensemble_results, vec![false]);
}

#[test]
fn engine_is_shared_across_workers() {
    let engine = Arc::new(BoundaryEngine::with_defaults());
    let registry = DetectorRegistry::with_builtins();
    let metrics: Vec<_> = (0..8)
        .map(|i| {
            Arc::new(
                registry
                    .resolve(
                        MetricConfig::new(format!("worker.{i}"), LESS_THAN)
                            .with_trigger(500.0 + i as f64 * 10.0),
                    )
                    .unwrap(),
            )
        })
        .collect();

    let handles: Vec<_> = metrics
        .iter()
        .cloned()
        .map(|metric| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let series = minutes(&request_rate(20));
                engine.evaluate(&series, &metric, NOW).unwrap()
            })
        })
        .collect();

    let verdicts: Vec<Verdict> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // last value is 500 + (19 % 7) * 10 = 550
    for (i, verdict) in verdicts.iter().enumerate() {
        assert_eq!(verdict.last_value, 550.0);
        assert_eq!(verdict.is_anomalous, 550.0 < 500.0 + i as f64 * 10.0);
    }
}

#[test]
fn one_bad_metric_does_not_stop_the_batch() {
    let mut registry = DetectorRegistry::with_builtins();
    registry
        .register("broken", |_: &[Sample], _: &DetectorParams| -> Result<bool, DetectorError> {
            Err(DetectorError::Failed("model not loaded".into()))
        })
        .unwrap();
    let broken = registry.resolve(MetricConfig::new("broken.metric", "broken")).unwrap();
    let healthy = registry
        .resolve(MetricConfig::new("nginx.requests", LESS_THAN).with_trigger(1000.0))
        .unwrap();

    let fresh = minutes(&request_rate(20));
    let stale: Vec<Sample> = fresh.iter().map(|s| Sample::new(s.timestamp - 10_000, s.value)).collect();

    let results = BoundaryEngine::with_defaults().evaluate_all(
        [
            (stale.as_slice(), &healthy),
            (fresh.as_slice(), &broken),
            (fresh.as_slice(), &healthy),
        ],
        NOW,
    );

    assert!(matches!(results[0], Err(Rejection::Stale { .. })));
    assert_eq!(results[1].as_ref().unwrap(), &Verdict::inconclusive(broken.config()));
    assert!(results[2].as_ref().unwrap().is_anomalous);
}
