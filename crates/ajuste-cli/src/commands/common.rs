//! Shared CLI arguments used by `identify` and `explore`.

use std::path::PathBuf;

use ajuste_config::{Experiment, FilterConfig, SignalConfig, WeightSpec};
use ajuste_core::FilterKind;
use clap::Args;

/// Parse a filter kind by id (`lms`, `nlms`, `rls`, `ap`, `fblms`) for clap.
pub fn parse_kind(s: &str) -> Result<FilterKind, String> {
    FilterKind::ALL
        .into_iter()
        .find(|k| k.id().eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            let ids: Vec<&str> = FilterKind::ALL.iter().map(|k| k.id()).collect();
            format!("unknown filter '{}' (expected one of: {})", s, ids.join(", "))
        })
}

/// Parse `zeros`, `random` or a comma-separated list of weights.
pub fn parse_weights(s: &str) -> Result<WeightSpec, String> {
    if s.contains(',') || s.parse::<f64>().is_ok() {
        s.split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map(WeightSpec::Values)
            .map_err(|e| format!("invalid weight list '{}': {}", s, e))
    } else {
        Ok(WeightSpec::Policy(s.to_string()))
    }
}

/// Filter and signal selection, either from flags or from an experiment file.
#[derive(Args, Debug, Clone)]
pub struct ExperimentArgs {
    /// Experiment TOML file; flags below are ignored when given
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Filter kind
    #[arg(short, long, default_value = "nlms", value_parser = parse_kind)]
    pub kind: FilterKind,

    /// Filter length (block length for fblms)
    #[arg(short = 'n', long, default_value_t = 8)]
    pub taps: usize,

    /// Step size (forgetting factor for rls)
    #[arg(long, default_value_t = 0.5)]
    pub mu: f64,

    /// Regularization / normalization term
    #[arg(long)]
    pub eps: Option<f64>,

    /// AP projection order
    #[arg(long)]
    pub order: Option<usize>,

    /// Initial weights: zeros, random or a comma-separated list
    #[arg(long, default_value = "zeros", value_parser = parse_weights)]
    pub weights: WeightSpec,

    /// Number of samples to generate
    #[arg(long, default_value_t = 2000)]
    pub samples: usize,

    /// Measurement noise standard deviation
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// Seed for data generation and random weights
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl ExperimentArgs {
    /// Resolve the flags or the file into a validated experiment.
    pub fn experiment(&self) -> anyhow::Result<Experiment> {
        let experiment = match &self.config {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading experiment");
                Experiment::load(path)?
            }
            None => {
                let mut filter = FilterConfig::new(self.kind, self.taps, self.mu)
                    .with_weights(self.weights.clone())
                    .with_seed(self.seed);
                if let Some(eps) = self.eps {
                    filter = filter.with_eps(eps);
                }
                if let Some(order) = self.order {
                    filter = filter.with_order(order);
                }
                Experiment::new(filter).with_signal(SignalConfig {
                    samples: self.samples,
                    noise: self.noise,
                    seed: self.seed,
                    system: None,
                })
            }
        };
        experiment.validate()?;
        Ok(experiment)
    }
}
