//! Weight vectors and their initialisation policy.
//!
//! Every filter owns exactly one weight vector and one random source. The
//! vector is created from a [`WeightInit`] policy at construction and may be
//! re-created in place at any time (the learning-rate explorer resets to
//! [`WeightInit::Zeros`] before each candidate).

use core::str::FromStr;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};
use crate::filter::{FilterKind, FilterParams};
use crate::param::{ParamRange, check_float_param, check_len};

/// Standard deviation of the Gaussian used by [`WeightInit::Random`].
pub const RANDOM_STD_DEV: f64 = 0.5;

/// How a filter's weights are (re)initialised.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeightInit {
    /// All weights zero.
    #[default]
    Zeros,
    /// Independent draws from N(0, 0.5²).
    Random,
    /// Caller-supplied weights; the length must equal the filter length.
    Values(Vec<f64>),
}

impl WeightInit {
    /// Produce `n` weights according to the policy.
    ///
    /// Only [`WeightInit::Random`] consumes randomness from `rng`.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>> {
        match self {
            WeightInit::Zeros => Ok(vec![0.0; n]),
            WeightInit::Random => {
                let normal = Normal::new(0.0, RANDOM_STD_DEV).map_err(|_| {
                    Error::ParameterOutOfRange {
                        name: "std_dev",
                        value: RANDOM_STD_DEV,
                        range: "[0, inf)".to_string(),
                    }
                })?;
                Ok((0..n).map(|_| normal.sample(&mut *rng)).collect())
            }
            WeightInit::Values(values) => {
                if values.len() == n {
                    Ok(values.clone())
                } else {
                    Err(Error::length_mismatch("initial weights", n, values.len()))
                }
            }
        }
    }
}

impl FromStr for WeightInit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zeros" => Ok(WeightInit::Zeros),
            "random" => Ok(WeightInit::Random),
            other => Err(Error::UnrecognizedPolicy(other.to_string())),
        }
    }
}

impl From<Vec<f64>> for WeightInit {
    fn from(values: Vec<f64>) -> Self {
        WeightInit::Values(values)
    }
}

impl From<&[f64]> for WeightInit {
    fn from(values: &[f64]) -> Self {
        WeightInit::Values(values.to_vec())
    }
}

/// State shared by every filter: length, step size and weights.
///
/// `padding` trailing zeros are appended to whatever the policy produces;
/// FBLMS uses this to keep a `2n` weight vector whose second half starts at zero.
#[derive(Debug, Clone)]
pub(crate) struct FilterBase {
    pub(crate) kind: FilterKind,
    pub(crate) n: usize,
    pub(crate) mu: f64,
    pub(crate) mu_range: ParamRange,
    pub(crate) w: Vec<f64>,
    padding: usize,
    rng: StdRng,
}

impl FilterBase {
    pub(crate) fn new(
        kind: FilterKind,
        n: usize,
        mu: f64,
        mu_range: ParamRange,
        init: &WeightInit,
        rng: StdRng,
    ) -> Result<Self> {
        Self::with_padding(kind, n, mu, mu_range, init, rng, 0)
    }

    pub(crate) fn with_padding(
        kind: FilterKind,
        n: usize,
        mu: f64,
        mu_range: ParamRange,
        init: &WeightInit,
        rng: StdRng,
        padding: usize,
    ) -> Result<Self> {
        let n = check_len(n, "n")?;
        let mu = check_float_param(mu, mu_range, "mu")?;
        let mut base = Self {
            kind,
            n,
            mu,
            mu_range,
            w: Vec::new(),
            padding,
            rng,
        };
        base.init_weights(init)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %kind, n, mu, "filter constructed");

        Ok(base)
    }

    /// Replace the weight vector in place.
    pub(crate) fn init_weights(&mut self, init: &WeightInit) -> Result<()> {
        let mut w = init.generate(self.n, &mut self.rng)?;
        w.resize(self.n + self.padding, 0.0);
        self.w = w;

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %self.kind, ?init, "weights initialised");

        Ok(())
    }

    pub(crate) fn set_step_size(&mut self, mu: f64) -> Result<()> {
        self.mu = check_float_param(mu, self.mu_range, "mu")?;
        Ok(())
    }

    pub(crate) fn params(&self) -> FilterParams {
        FilterParams {
            n: self.n,
            mu: self.mu,
            weights: self.w.clone(),
        }
    }
}

/// Random source used when the caller does not supply one.
pub(crate) fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}
