use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use assert_approx_eq::assert_approx_eq;
use tempfile::TempDir;

use broiler_growth_forecaster::{
    analysis::{resolve_target_day, Forecaster, GrowthCurve, Selection},
    error::ForecastError,
    io,
    models::{Algorithm, ModelKey, ObservationSet, ObservationSlot, Scenario},
    regression::{
        write_artifact, Aggregation, LinearRegressor, ModelArtifact, Tree, TreeEnsemble, TreeNode,
    },
    registry::{Manifest, ManifestEntry, ModelRegistry},
};

fn sample_store() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/models")
}

fn stump(feature: usize, threshold: f64, lo: Vec<f64>, hi: Vec<f64>) -> Tree {
    Tree {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { values: lo },
            TreeNode::Leaf { values: hi },
        ],
    }
}

/// A small store: linear A, boosted B and two per-day extra-trees models.
fn create_test_store(dir: &TempDir) -> PathBuf {
    let store = dir.path().to_path_buf();

    let ridge_a = ModelArtifact::Linear(LinearRegressor {
        n_features: 4,
        coefficients: vec![
            vec![0.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ],
        intercepts: vec![500.0, 1100.0, 1700.0],
    });
    let xgb_b = ModelArtifact::TreeEnsemble(TreeEnsemble {
        n_features: 6,
        n_outputs: 2,
        aggregation: Aggregation::Sum {
            base_score: vec![2600.0, 3200.0],
        },
        trees: vec![stump(5, 40.0, vec![-50.0, -80.0], vec![50.0, 80.0])],
    });
    let etr = |lo: f64, hi: f64| {
        ModelArtifact::TreeEnsemble(TreeEnsemble {
            n_features: 5,
            n_outputs: 1,
            aggregation: Aggregation::Mean,
            trees: vec![
                stump(4, 1950.0, vec![lo], vec![hi]),
                stump(4, 1950.0, vec![lo + 20.0], vec![hi + 20.0]),
            ],
        })
    };

    write_artifact(&ridge_a, store.join("ridge_a.json"), true).unwrap();
    write_artifact(&xgb_b, store.join("xgb_b.json"), false).unwrap();
    write_artifact(&etr(2500.0, 2700.0), store.join("etr_42.json"), true).unwrap();
    write_artifact(&etr(3100.0, 3300.0), store.join("etr_49.json"), true).unwrap();

    let manifest = Manifest {
        models: vec![
            ManifestEntry::variant(Scenario::A, Algorithm::Ridge, "ridge_a.json"),
            ManifestEntry::variant(Scenario::B, Algorithm::Xgb, "xgb_b.json"),
            ManifestEntry::day_label("Dia 42", "etr_42.json"),
            ManifestEntry::day_label("Dia 49+", "etr_49.json"),
        ],
    };
    std::fs::write(store.join("models.toml"), manifest.to_toml().unwrap()).unwrap();
    store
}

fn weights(pairs: &[(u32, f64)]) -> ObservationSet {
    let mut obs = ObservationSet::new();
    for &(day, grams) in pairs {
        obs.insert(day, grams).unwrap();
    }
    obs
}

fn first_four_weeks() -> ObservationSet {
    weights(&[(7, 200.0), (14, 500.0), (21, 1000.0), (28, 1500.0)])
}

fn first_five_weeks() -> ObservationSet {
    weights(&[
        (7, 200.0),
        (14, 500.0),
        (21, 1000.0),
        (28, 1500.0),
        (35, 2000.0),
    ])
}

#[test]
fn test_full_pipeline_scenario_a() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();
    assert_eq!(registry.len(), 4);

    let forecast = Forecaster::new(&registry)
        .forecast(
            Selection::Variant {
                scenario: Scenario::A,
                algorithm: Algorithm::Ridge,
            },
            &first_four_weeks(),
            Some(2900.0),
        )
        .unwrap();

    assert_eq!(forecast.scenario, Scenario::A);
    assert_eq!(forecast.prediction.days(), vec![35, 42, 49]);
    assert_approx_eq!(forecast.prediction.weight_on(35).unwrap(), 2000.0);
    assert_approx_eq!(forecast.prediction.weight_on(42).unwrap(), 2600.0);
    assert_approx_eq!(forecast.prediction.weight_on(49).unwrap(), 3200.0);

    // Knots reproduce both observed and predicted weights.
    assert_approx_eq!(forecast.curve.evaluate(21.0), 1000.0);
    assert_approx_eq!(forecast.curve.evaluate(42.0), 2600.0);

    let target = forecast.target.unwrap();
    assert!(target.monotonic);
    assert_approx_eq!(target.estimated_day, 45.5);
}

#[test]
fn test_full_pipeline_scenario_b() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();
    let selection = Selection::Variant {
        scenario: Scenario::B,
        algorithm: Algorithm::Xgb,
    };

    let older = first_five_weeks().with_batch_age(45);
    let prediction = Forecaster::new(&registry)
        .predict(selection, &older)
        .unwrap();
    assert_eq!(prediction.days(), vec![42, 49]);
    assert_approx_eq!(prediction.weight_on(42).unwrap(), 2650.0);
    assert_approx_eq!(prediction.weight_on(49).unwrap(), 3280.0);

    let younger = first_five_weeks().with_batch_age(38);
    let prediction = Forecaster::new(&registry)
        .predict(selection, &younger)
        .unwrap();
    assert_approx_eq!(prediction.weight_on(42).unwrap(), 2550.0);
}

#[test]
fn test_scenario_b_requires_batch_age() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();
    let err = Forecaster::new(&registry)
        .predict(
            Selection::Variant {
                scenario: Scenario::B,
                algorithm: Algorithm::Xgb,
            },
            &first_five_weeks(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ForecastError::MissingObservation(ObservationSlot::BatchAge)
    ));
}

#[test]
fn test_full_pipeline_day_labels() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();

    let forecast = Forecaster::new(&registry)
        .forecast(Selection::DayLabels, &first_five_weeks(), None)
        .unwrap();
    assert_eq!(forecast.scenario, Scenario::SingleDayVector);
    assert_eq!(forecast.prediction.days(), vec![42, 49]);
    // Day 35 weight of 2000 lands right of every split: mean(2700, 2720).
    assert_approx_eq!(forecast.prediction.weight_on(42).unwrap(), 2710.0);
    assert_approx_eq!(forecast.prediction.weight_on(49).unwrap(), 3310.0);
    assert!(forecast.target.is_none());
}

#[test]
fn test_missing_weighing_is_reported() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();
    let obs = weights(&[(7, 200.0), (14, 500.0), (28, 1500.0)]);

    let err = Forecaster::new(&registry)
        .predict(
            Selection::Variant {
                scenario: Scenario::A,
                algorithm: Algorithm::Ridge,
            },
            &obs,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ForecastError::MissingObservation(ObservationSlot::Weight(21))
    ));
}

#[test]
fn test_unregistered_variant() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();
    let err = Forecaster::new(&registry)
        .predict(
            Selection::Variant {
                scenario: Scenario::A,
                algorithm: Algorithm::Xgb,
            },
            &first_four_weeks(),
        )
        .unwrap_err();
    assert!(matches!(err, ForecastError::ModelNotFound(_)));
    assert!(!registry.contains(&ModelKey::variant(Scenario::A, Algorithm::Xgb)));
}

#[test]
fn test_load_fails_on_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(&dir);
    std::fs::remove_file(store.join("xgb_b.json")).unwrap();

    let err = ModelRegistry::load(&store).unwrap_err();
    match err {
        ForecastError::Load { artifact, .. } => assert!(artifact.ends_with("xgb_b.json")),
        other => panic!("expected load error, got {other:?}"),
    }
}

#[test]
fn test_load_fails_on_corrupt_artifact() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(&dir);
    std::fs::write(store.join("ridge_a.json"), "{\"kind\": \"linear\", \"n_features\": 4").unwrap();

    let err = ModelRegistry::load(&store).unwrap_err();
    assert!(matches!(err, ForecastError::Load { .. }));
}

#[test]
fn test_load_fails_on_wrong_input_dimension() {
    let dir = TempDir::new().unwrap();
    let store = create_test_store(&dir);
    let five_inputs = ModelArtifact::Linear(LinearRegressor {
        n_features: 5,
        coefficients: vec![vec![0.0; 5]; 3],
        intercepts: vec![0.0; 3],
    });
    write_artifact(&five_inputs, store.join("ridge_a.json"), false).unwrap();

    let err = ModelRegistry::load(&store).unwrap_err();
    assert!(matches!(err, ForecastError::Load { .. }));
}

#[test]
fn test_load_fails_without_manifest() {
    let dir = TempDir::new().unwrap();
    let err = ModelRegistry::load(dir.path()).unwrap_err();
    assert!(matches!(err, ForecastError::Load { .. }));
}

#[test]
fn test_registry_shared_across_threads() {
    let dir = TempDir::new().unwrap();
    let registry = Arc::new(ModelRegistry::load(create_test_store(&dir)).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let obs = weights(&[
                    (7, 200.0),
                    (14, 500.0),
                    (21, 1000.0),
                    (28, 1500.0 + f64::from(i) * 10.0),
                ]);
                Forecaster::new(&registry)
                    .predict(
                        Selection::Variant {
                            scenario: Scenario::A,
                            algorithm: Algorithm::Ridge,
                        },
                        &obs,
                    )
                    .unwrap()
                    .weight_on(35)
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_approx_eq!(handle.join().unwrap(), 2000.0 + i as f64 * 10.0);
    }
}

#[test]
fn test_sample_store_loads_and_predicts() {
    let registry = ModelRegistry::load(sample_store()).unwrap();
    assert_eq!(registry.len(), 6);
    assert_eq!(registry.day_label_models().len(), 2);

    let forecast = Forecaster::new(&registry)
        .forecast(
            Selection::Variant {
                scenario: Scenario::A,
                algorithm: Algorithm::Ridge,
            },
            &first_four_weeks(),
            Some(2800.0),
        )
        .unwrap();
    assert_approx_eq!(forecast.prediction.weight_on(35).unwrap(), 2000.0);
    assert_approx_eq!(forecast.prediction.weight_on(42).unwrap(), 2700.0);
    assert_approx_eq!(forecast.prediction.weight_on(49).unwrap(), 3300.0);
    assert_approx_eq!(forecast.target.unwrap().estimated_day, 42.0 + 7.0 / 6.0);
}

#[test]
fn test_observations_from_files_feed_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();

    let csv_path = dir.path().join("batch.csv");
    std::fs::write(&csv_path, "day,weight_g\n7,200\n14,500\n21,1000\n28,1500\n").unwrap();
    let json_path = dir.path().join("batch.json");
    std::fs::write(
        &json_path,
        r#"{"weights": {"7": 200.0, "14": 500.0, "21": 1000.0, "28": 1500.0}}"#,
    )
    .unwrap();

    let from_csv = io::reader_for(&csv_path).unwrap().read(&csv_path).unwrap();
    let from_json = io::reader_for(&json_path).unwrap().read(&json_path).unwrap();
    assert_eq!(from_csv, from_json);

    let selection = Selection::Variant {
        scenario: Scenario::A,
        algorithm: Algorithm::Ridge,
    };
    let forecaster = Forecaster::new(&registry);
    assert_eq!(
        forecaster.predict(selection, &from_csv).unwrap(),
        forecaster.predict(selection, &from_json).unwrap()
    );
}

#[test]
fn test_export_curve_and_forecast() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load(create_test_store(&dir)).unwrap();
    let forecast = Forecaster::new(&registry)
        .forecast(
            Selection::Variant {
                scenario: Scenario::A,
                algorithm: Algorithm::Ridge,
            },
            &first_four_weeks(),
            Some(3800.0),
        )
        .unwrap();

    let curve_path = dir.path().join("curve.csv");
    io::write_curve_csv(forecast.curve.sample(forecast.chart_days()), &curve_path).unwrap();
    let content = std::fs::read_to_string(&curve_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("day,weight_g"));
    // 7..=56: the target at day 56 stretches the chart past day 49.
    assert_eq!(lines.count(), 50);

    let json_path = dir.path().join("forecast.json");
    io::write_forecast_json(&forecast, &json_path, true).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["scenario"], "A");
    assert_eq!(value["prediction"]["points"].as_array().unwrap().len(), 3);
    assert_approx_eq!(value["target"]["estimated_day"].as_f64().unwrap(), 56.0);
}

#[test]
fn test_curve_without_models() {
    let points = [(35.0, 2000.0), (42.0, 2600.0), (49.0, 3200.0)];
    let curve = GrowthCurve::fit(&points).unwrap();
    assert_approx_eq!(curve.evaluate(45.5), 2900.0);

    let estimate = resolve_target_day(&points, 3500.0).unwrap();
    assert_approx_eq!(estimate.estimated_day, 52.5);
}
