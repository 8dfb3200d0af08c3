//! Filter descriptions and construction.

use serde::{Deserialize, Serialize};

use ajuste_core::{AnyFilter, Ap, Fblms, FilterKind, Lms, Nlms, Rls, SeedableRng, StdRng, WeightInit};

use crate::error::ConfigError;

/// Default NLMS normalization floor.
pub const DEFAULT_NLMS_EPS: f64 = 0.001;
/// Default RLS initial covariance scale.
pub const DEFAULT_RLS_EPS: f64 = 0.1;
/// Default AP regularization.
pub const DEFAULT_AP_EPS: f64 = 0.001;
/// Default AP projection order.
pub const DEFAULT_AP_ORDER: usize = 5;

/// Initial weights as written in a file: a policy name or explicit values.
///
/// ```toml
/// weights = "random"
/// # or
/// weights = [0.5, -0.25, 0.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightSpec {
    /// `"zeros"` or `"random"`.
    Policy(String),
    /// Explicit initial weights.
    Values(Vec<f64>),
}

impl Default for WeightSpec {
    fn default() -> Self {
        WeightSpec::Policy("zeros".to_string())
    }
}

impl WeightSpec {
    /// Resolve into a core weight policy.
    pub fn to_init(&self) -> Result<WeightInit, ConfigError> {
        match self {
            WeightSpec::Policy(name) => Ok(name.parse()?),
            WeightSpec::Values(values) => Ok(WeightInit::Values(values.clone())),
        }
    }
}

fn default_nlms_eps() -> f64 {
    DEFAULT_NLMS_EPS
}

fn default_rls_eps() -> f64 {
    DEFAULT_RLS_EPS
}

fn default_ap_eps() -> f64 {
    DEFAULT_AP_EPS
}

fn default_ap_order() -> usize {
    DEFAULT_AP_ORDER
}

/// One adaptive filter, tagged by `kind`.
///
/// # TOML Format
///
/// ```toml
/// [filter]
/// kind = "ap"
/// n = 8
/// mu = 0.5
/// order = 4
/// eps = 0.01
/// weights = "random"
/// seed = 42
/// ```
///
/// `eps` and `order` fall back to the `DEFAULT_*` constants when omitted.
/// Without a `seed`, random weights are drawn from OS entropy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterConfig {
    /// Least mean squares.
    Lms {
        /// Filter length.
        n: usize,
        /// Step size.
        mu: f64,
        /// Initial weights.
        #[serde(default)]
        weights: WeightSpec,
        /// Seed for random weights.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Normalized least mean squares.
    Nlms {
        /// Filter length.
        n: usize,
        /// Step size.
        mu: f64,
        /// Normalization floor.
        #[serde(default = "default_nlms_eps")]
        eps: f64,
        /// Initial weights.
        #[serde(default)]
        weights: WeightSpec,
        /// Seed for random weights.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Recursive least squares.
    Rls {
        /// Filter length.
        n: usize,
        /// Forgetting factor.
        mu: f64,
        /// Initial covariance scale.
        #[serde(default = "default_rls_eps")]
        eps: f64,
        /// Initial weights.
        #[serde(default)]
        weights: WeightSpec,
        /// Seed for random weights.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Affine projection.
    Ap {
        /// Filter length.
        n: usize,
        /// Step size.
        mu: f64,
        /// Projection order.
        #[serde(default = "default_ap_order")]
        order: usize,
        /// Regularization.
        #[serde(default = "default_ap_eps")]
        eps: f64,
        /// Initial weights.
        #[serde(default)]
        weights: WeightSpec,
        /// Seed for random weights.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Frequency-domain block LMS; `n` is the block length.
    Fblms {
        /// Block length.
        n: usize,
        /// Step size.
        mu: f64,
        /// Initial weights (`n` active taps).
        #[serde(default)]
        weights: WeightSpec,
        /// Seed for random weights.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

impl FilterConfig {
    /// A configuration with default `eps`, `order` and zero weights.
    pub fn new(kind: FilterKind, n: usize, mu: f64) -> Self {
        let weights = WeightSpec::default();
        match kind {
            FilterKind::Lms => FilterConfig::Lms {
                n,
                mu,
                weights,
                seed: None,
            },
            FilterKind::Nlms => FilterConfig::Nlms {
                n,
                mu,
                eps: DEFAULT_NLMS_EPS,
                weights,
                seed: None,
            },
            FilterKind::Rls => FilterConfig::Rls {
                n,
                mu,
                eps: DEFAULT_RLS_EPS,
                weights,
                seed: None,
            },
            FilterKind::Ap => FilterConfig::Ap {
                n,
                mu,
                order: DEFAULT_AP_ORDER,
                eps: DEFAULT_AP_EPS,
                weights,
                seed: None,
            },
            FilterKind::Fblms => FilterConfig::Fblms {
                n,
                mu,
                weights,
                seed: None,
            },
        }
    }

    /// Set `eps`. Ignored by kinds without one.
    pub fn with_eps(mut self, value: f64) -> Self {
        match &mut self {
            FilterConfig::Nlms { eps, .. }
            | FilterConfig::Rls { eps, .. }
            | FilterConfig::Ap { eps, .. } => *eps = value,
            FilterConfig::Lms { .. } | FilterConfig::Fblms { .. } => {}
        }
        self
    }

    /// Set the AP projection order. Ignored by other kinds.
    pub fn with_order(mut self, value: usize) -> Self {
        if let FilterConfig::Ap { order, .. } = &mut self {
            *order = value;
        }
        self
    }

    /// Set the initial weights.
    pub fn with_weights(mut self, spec: WeightSpec) -> Self {
        *self.weights_mut() = spec;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, value: u64) -> Self {
        *self.seed_mut() = Some(value);
        self
    }

    /// Which algorithm this describes.
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterConfig::Lms { .. } => FilterKind::Lms,
            FilterConfig::Nlms { .. } => FilterKind::Nlms,
            FilterConfig::Rls { .. } => FilterKind::Rls,
            FilterConfig::Ap { .. } => FilterKind::Ap,
            FilterConfig::Fblms { .. } => FilterKind::Fblms,
        }
    }

    /// Filter (or block) length.
    pub fn n(&self) -> usize {
        match *self {
            FilterConfig::Lms { n, .. }
            | FilterConfig::Nlms { n, .. }
            | FilterConfig::Rls { n, .. }
            | FilterConfig::Ap { n, .. }
            | FilterConfig::Fblms { n, .. } => n,
        }
    }

    /// Step size.
    pub fn mu(&self) -> f64 {
        match *self {
            FilterConfig::Lms { mu, .. }
            | FilterConfig::Nlms { mu, .. }
            | FilterConfig::Rls { mu, .. }
            | FilterConfig::Ap { mu, .. }
            | FilterConfig::Fblms { mu, .. } => mu,
        }
    }

    /// Initial weight description.
    pub fn weights(&self) -> &WeightSpec {
        match self {
            FilterConfig::Lms { weights, .. }
            | FilterConfig::Nlms { weights, .. }
            | FilterConfig::Rls { weights, .. }
            | FilterConfig::Ap { weights, .. }
            | FilterConfig::Fblms { weights, .. } => weights,
        }
    }

    fn weights_mut(&mut self) -> &mut WeightSpec {
        match self {
            FilterConfig::Lms { weights, .. }
            | FilterConfig::Nlms { weights, .. }
            | FilterConfig::Rls { weights, .. }
            | FilterConfig::Ap { weights, .. }
            | FilterConfig::Fblms { weights, .. } => weights,
        }
    }

    /// Random seed, if any.
    pub fn seed(&self) -> Option<u64> {
        match *self {
            FilterConfig::Lms { seed, .. }
            | FilterConfig::Nlms { seed, .. }
            | FilterConfig::Rls { seed, .. }
            | FilterConfig::Ap { seed, .. }
            | FilterConfig::Fblms { seed, .. } => seed,
        }
    }

    fn seed_mut(&mut self) -> &mut Option<u64> {
        match self {
            FilterConfig::Lms { seed, .. }
            | FilterConfig::Nlms { seed, .. }
            | FilterConfig::Rls { seed, .. }
            | FilterConfig::Ap { seed, .. }
            | FilterConfig::Fblms { seed, .. } => seed,
        }
    }

    /// Construct the filter, surfacing the core crate's validation errors.
    pub fn build(&self) -> Result<AnyFilter, ConfigError> {
        let init = self.weights().to_init()?;
        let rng = match self.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let filter = match *self {
            FilterConfig::Lms { n, mu, .. } => Lms::with_rng(n, mu, init, rng)?.into(),
            FilterConfig::Nlms { n, mu, eps, .. } => Nlms::with_rng(n, mu, eps, init, rng)?.into(),
            FilterConfig::Rls { n, mu, eps, .. } => Rls::with_rng(n, mu, eps, init, rng)?.into(),
            FilterConfig::Ap {
                n, mu, order, eps, ..
            } => Ap::with_rng(n, mu, order, eps, init, rng)?.into(),
            FilterConfig::Fblms { n, mu, .. } => Fblms::with_rng(n, mu, init, rng)?.into(),
        };
        Ok(filter)
    }
}
