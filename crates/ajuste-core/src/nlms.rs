//! NLMS (Normalized Least Mean Squares) adaptive filter.
//!
//! NLMS normalizes the LMS step by the instantaneous input power:
//!
//! ```text
//! ν     = μ / (ε + x · x)
//! w[i] += ν * e * x[i]
//! ```
//!
//! `ε` keeps the denominator away from zero when the input is silent. With
//! `ε = 0` an all-zero input vector produces NaN weights.

use rand::rngs::StdRng;

use crate::error::Result;
use crate::filter::{
    AdaptiveFilter, FilterKind, RunOutput, SampleFilter, SampleStep, dot, run_samples,
};
use crate::param::{self, check_float_param};
use crate::weights::{FilterBase, WeightInit, entropy_rng};

/// Normalized Least Mean Squares adaptive filter.
///
/// `mu` lies in `[0, 2]`, `eps` in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Nlms {
    base: FilterBase,
    eps: f64,
}

impl Nlms {
    /// Create an NLMS filter, seeding its random source from the OS.
    pub fn new(n: usize, mu: f64, eps: f64, init: impl Into<WeightInit>) -> Result<Self> {
        Self::with_rng(n, mu, eps, init, entropy_rng())
    }

    /// Create an NLMS filter with an explicit random source.
    pub fn with_rng(
        n: usize,
        mu: f64,
        eps: f64,
        init: impl Into<WeightInit>,
        rng: StdRng,
    ) -> Result<Self> {
        let eps = check_float_param(eps, param::NLMS_EPS, "eps")?;
        let base = FilterBase::new(FilterKind::Nlms, n, mu, param::NLMS_MU, &init.into(), rng)?;
        Ok(Self { base, eps })
    }

    /// Normalization floor ε.
    pub fn eps(&self) -> f64 {
        self.eps
    }
}

impl AdaptiveFilter for Nlms {
    fn kind(&self) -> FilterKind {
        FilterKind::Nlms
    }

    fn filter_len(&self) -> usize {
        self.base.n
    }

    fn step_size(&self) -> f64 {
        self.base.mu
    }

    fn set_step_size(&mut self, mu: f64) -> Result<()> {
        self.base.set_step_size(mu)
    }

    fn weights(&self) -> &[f64] {
        &self.base.w
    }

    fn init_weights(&mut self, init: &WeightInit) -> Result<()> {
        self.base.init_weights(init)
    }
}

impl SampleStep for Nlms {
    fn step(&mut self, d: f64, x: &[f64], _index: usize) -> Result<(f64, f64)> {
        let w = &mut self.base.w;
        let y = dot(w, x);
        let e = d - y;

        let nu = self.base.mu / (self.eps + dot(x, x));
        for (wi, &xi) in w.iter_mut().zip(x) {
            *wi += nu * e * xi;
        }
        Ok((y, e))
    }
}

impl SampleFilter for Nlms {
    fn adapt(&mut self, d: f64, x: &[f64]) {
        debug_assert_eq!(x.len(), self.base.n, "input length must equal filter length");
        let _ = self.step(d, x, 0);
    }

    fn run(&mut self, d: &[f64], x: &[Vec<f64>]) -> Result<RunOutput> {
        run_samples(self, d, x)
    }
}
