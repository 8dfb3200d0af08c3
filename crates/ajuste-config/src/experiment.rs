//! Experiment files: a filter, an optional sweep and a synthetic signal.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ajuste_core::{AnyFilter, ErrorMetric, ExploreOptions};

use crate::error::ConfigError;
use crate::filter_config::FilterConfig;

/// Learning-rate sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreConfig {
    /// First candidate step size.
    pub mu_start: f64,
    /// Last candidate step size.
    pub mu_end: f64,
    /// Number of candidates.
    pub steps: usize,
    /// Training share of the data (defaults to 0.5).
    #[serde(default = "default_n_train")]
    pub n_train: f64,
    /// Training passes per candidate (defaults to 1).
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    /// `"MAE"`, `"MSE"` or `"RMSE"` (defaults to MSE).
    #[serde(default = "default_metric")]
    pub metric: String,
}

fn default_n_train() -> f64 {
    0.5
}

fn default_epochs() -> usize {
    1
}

fn default_metric() -> String {
    ErrorMetric::Mse.name().to_string()
}

impl ExploreConfig {
    /// A sweep with the default split, one epoch and MSE.
    pub fn new(mu_start: f64, mu_end: f64, steps: usize) -> Self {
        Self {
            mu_start,
            mu_end,
            steps,
            n_train: default_n_train(),
            epochs: default_epochs(),
            metric: default_metric(),
        }
    }

    /// Resolve the split, epochs and metric into core options.
    pub fn options(&self) -> Result<ExploreOptions, ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::invalid("explore.steps", "must be at least 1"));
        }
        Ok(ExploreOptions::new()
            .with_n_train(self.n_train)
            .with_epochs(self.epochs)
            .with_metric_name(&self.metric)?)
    }
}

/// Synthetic system-identification data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Number of samples to generate.
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Standard deviation of the measurement noise added to the desired signal.
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Seed for the input, the unknown system and the noise.
    #[serde(default)]
    pub seed: u64,
    /// Taps of the unknown system. Drawn at random when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<f64>>,
}

fn default_samples() -> usize {
    1000
}

fn default_noise() -> f64 {
    0.01
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            noise: default_noise(),
            seed: 0,
            system: None,
        }
    }
}

impl SignalConfig {
    /// Check the sample count, noise level and system taps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::invalid("signal.samples", "must be at least 1"));
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(ConfigError::invalid(
                "signal.noise",
                format!("must be a non-negative number, got {}", self.noise),
            ));
        }
        if let Some(system) = &self.system
            && (system.is_empty() || system.iter().any(|t| !t.is_finite()))
        {
            return Err(ConfigError::invalid(
                "signal.system",
                "must hold at least one finite tap",
            ));
        }
        Ok(())
    }
}

/// A complete experiment.
///
/// # TOML Format
///
/// ```toml
/// [filter]
/// kind = "nlms"
/// n = 8
/// mu = 0.5
/// eps = 0.001
///
/// [explore]
/// mu_start = 0.01
/// mu_end = 1.0
/// steps = 20
/// metric = "MSE"
///
/// [signal]
/// samples = 2000
/// noise = 0.01
/// seed = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// The filter under test.
    pub filter: FilterConfig,

    /// Optional learning-rate sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explore: Option<ExploreConfig>,

    /// Data generation settings.
    #[serde(default)]
    pub signal: SignalConfig,
}

impl Experiment {
    /// An experiment with default signal settings and no sweep.
    pub fn new(filter: FilterConfig) -> Self {
        Self {
            filter,
            explore: None,
            signal: SignalConfig::default(),
        }
    }

    /// Attach a sweep.
    pub fn with_explore(mut self, explore: ExploreConfig) -> Self {
        self.explore = Some(explore);
        self
    }

    /// Replace the signal settings.
    pub fn with_signal(mut self, signal: SignalConfig) -> Self {
        self.signal = signal;
        self
    }

    /// Load an experiment from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let experiment: Experiment = toml::from_str(&content)?;
        Ok(experiment)
    }

    /// Load an experiment from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the experiment to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the experiment to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section without running anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.build()?;
        if let Some(explore) = &self.explore {
            explore.options()?;
        }
        self.signal.validate()
    }

    /// Construct the configured filter.
    pub fn build(&self) -> Result<AnyFilter, ConfigError> {
        self.filter.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajuste_core::FilterKind;

    const FULL: &str = r#"
[filter]
kind = "rls"
n = 4
mu = 0.98
eps = 0.5
weights = "random"
seed = 3

[explore]
mu_start = 0.9
mu_end = 1.0
steps = 5
metric = "RMSE"

[signal]
samples = 500
noise = 0.0
seed = 11
system = [0.5, -0.2]
"#;

    #[test]
    fn parse_full_experiment() {
        let exp = Experiment::from_toml(FULL).unwrap();
        assert_eq!(exp.filter.kind(), FilterKind::Rls);
        assert_eq!(exp.filter.seed(), Some(3));

        let explore = exp.explore.as_ref().unwrap();
        assert_eq!(explore.steps, 5);
        assert_eq!(explore.n_train, 0.5);
        assert_eq!(explore.epochs, 1);
        let options = explore.options().unwrap();
        assert_eq!(options.metric, ErrorMetric::Rmse);

        assert_eq!(exp.signal.samples, 500);
        assert_eq!(exp.signal.system, Some(vec![0.5, -0.2]));
        exp.validate().unwrap();
    }

    #[test]
    fn minimal_experiment_uses_defaults() {
        let exp = Experiment::from_toml("[filter]\nkind = \"lms\"\nn = 2\nmu = 0.1\n").unwrap();
        assert!(exp.explore.is_none());
        assert_eq!(exp.signal, SignalConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let exp = Experiment::from_toml(FULL).unwrap();
        let text = exp.to_toml().unwrap();
        assert_eq!(Experiment::from_toml(&text).unwrap(), exp);
    }

    #[test]
    fn bad_metric_is_reported() {
        let mut explore = ExploreConfig::new(0.1, 1.0, 3);
        explore.metric = "MAPE".to_string();
        assert!(matches!(
            explore.options(),
            Err(ConfigError::Filter(ajuste_core::Error::UnknownMetric(_)))
        ));
    }

    #[test]
    fn zero_steps_rejected() {
        let explore = ExploreConfig::new(0.1, 1.0, 0);
        assert!(matches!(
            explore.options(),
            Err(ConfigError::InvalidValue { field: "explore.steps", .. })
        ));
    }

    #[test]
    fn signal_validation() {
        let mut signal = SignalConfig::default();
        signal.validate().unwrap();

        signal.noise = -1.0;
        assert!(signal.validate().is_err());

        signal.noise = 0.0;
        signal.system = Some(Vec::new());
        assert!(signal.validate().is_err());

        signal.system = None;
        signal.samples = 0;
        assert!(signal.validate().is_err());
    }

    #[test]
    fn validate_surfaces_filter_errors() {
        let exp = Experiment::new(FilterConfig::new(FilterKind::Nlms, 4, 3.0));
        assert!(matches!(exp.validate(), Err(ConfigError::Filter(_))));
    }
}
