//! Experiment configuration for ajuste adaptive filters.
//!
//! Experiments are TOML files describing one filter, an optional
//! learning-rate sweep and the synthetic data to run it on.
//!
//! # Example
//!
//! ```rust
//! use ajuste_config::{Experiment, ExploreConfig, FilterConfig};
//! use ajuste_core::{AdaptiveFilter, FilterKind};
//!
//! let experiment = Experiment::new(FilterConfig::new(FilterKind::Nlms, 8, 0.5))
//!     .with_explore(ExploreConfig::new(0.05, 1.0, 20));
//!
//! let text = experiment.to_toml().unwrap();
//! let parsed = Experiment::from_toml(&text).unwrap();
//! assert_eq!(parsed, experiment);
//!
//! let filter = parsed.build().unwrap();
//! assert_eq!(filter.filter_len(), 8);
//! ```

mod error;
mod experiment;
mod filter_config;

pub use error::ConfigError;
pub use experiment::{ExploreConfig, Experiment, SignalConfig};
pub use filter_config::{
    DEFAULT_AP_EPS, DEFAULT_AP_ORDER, DEFAULT_NLMS_EPS, DEFAULT_RLS_EPS, FilterConfig, WeightSpec,
};
