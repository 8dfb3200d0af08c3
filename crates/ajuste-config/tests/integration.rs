//! Integration tests for ajuste-config.
//!
//! Experiments are written to disk, read back and turned into running filters.

use ajuste_config::{ConfigError, Experiment, ExploreConfig, FilterConfig, SignalConfig, WeightSpec};
use ajuste_core::{AdaptiveFilter, FilterKind, explore_learning};
use tempfile::TempDir;

#[test]
fn save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("experiment.toml");

    let experiment = Experiment::new(
        FilterConfig::new(FilterKind::Ap, 6, 0.4)
            .with_order(3)
            .with_eps(0.02)
            .with_weights(WeightSpec::Values(vec![0.0; 6])),
    )
    .with_explore(ExploreConfig::new(0.1, 0.9, 9))
    .with_signal(SignalConfig {
        samples: 256,
        noise: 0.05,
        seed: 4,
        system: Some(vec![1.0, 0.5]),
    });

    experiment.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Experiment::load(&path).unwrap();
    assert_eq!(loaded, experiment);
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");
    let err = Experiment::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = Experiment::from_toml("[filter\nkind = ").unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn loaded_experiment_drives_a_sweep() {
    let text = r#"
[filter]
kind = "nlms"
n = 2
mu = 0.5

[explore]
mu_start = 0.1
mu_end = 1.0
steps = 4
epochs = 2
metric = "mae"
"#;
    let experiment = Experiment::from_toml(text).unwrap();
    experiment.validate().unwrap();

    let mut filter = experiment.build().unwrap();
    let explore = experiment.explore.as_ref().unwrap();
    let options = explore.options().unwrap();

    let x: Vec<Vec<f64>> = (0..200)
        .map(|i| {
            let t = f64::from(i);
            vec![(0.3 * t).sin(), (0.3 * (t - 1.0)).sin()]
        })
        .collect();
    let d: Vec<f64> = x.iter().map(|r| 0.7 * r[0] + 0.2 * r[1]).collect();

    let sample = filter.as_sample_mut().unwrap();
    let result = explore_learning(
        sample,
        &d,
        &x,
        explore.mu_start,
        explore.mu_end,
        explore.steps,
        &options,
    )
    .unwrap();

    assert_eq!(result.step_sizes.len(), 4);
    assert!(result.errors.iter().all(|e| e.is_finite()));
    assert!((filter.step_size() - 1.0).abs() < 1e-12);
}
