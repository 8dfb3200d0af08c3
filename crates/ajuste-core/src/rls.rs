//! RLS (Recursive Least Squares) adaptive filter.
//!
//! The filter carries an `n × n` matrix `R`, initialised to `(1/ε) I`, that
//! is updated every sample without ever being inverted directly:
//!
//! ```text
//! y  = w · x
//! e  = d - y
//! a  = (R x) · x
//! R1 = a R / (μ + xᵀ R x)
//! R  = (R - R1) / μ
//! w += e (R x)              (using the updated R)
//! ```
//!
//! `μ` acts as the forgetting factor. `R` stays symmetric because every
//! update scales a symmetric matrix.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;

use crate::error::Result;
use crate::filter::{
    AdaptiveFilter, FilterKind, RunOutput, SampleFilter, SampleStep, dot, run_samples,
};
use crate::param::{self, check_float_param};
use crate::weights::{FilterBase, WeightInit, entropy_rng};

/// Recursive Least Squares adaptive filter.
///
/// `mu` (forgetting factor) lies in `(0, 1]`, `eps` in `(0, 1]`.
#[derive(Debug, Clone)]
pub struct Rls {
    base: FilterBase,
    eps: f64,
    r: DMatrix<f64>,
}

impl Rls {
    /// Create an RLS filter, seeding its random source from the OS.
    pub fn new(n: usize, mu: f64, eps: f64, init: impl Into<WeightInit>) -> Result<Self> {
        Self::with_rng(n, mu, eps, init, entropy_rng())
    }

    /// Create an RLS filter with an explicit random source.
    pub fn with_rng(
        n: usize,
        mu: f64,
        eps: f64,
        init: impl Into<WeightInit>,
        rng: StdRng,
    ) -> Result<Self> {
        let eps = check_float_param(eps, param::RLS_EPS, "eps")?;
        let base = FilterBase::new(FilterKind::Rls, n, mu, param::RLS_MU, &init.into(), rng)?;
        let r = initial_covariance(base.n, eps);
        Ok(Self { base, eps, r })
    }

    /// Initial covariance scale ε.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// The current matrix `R`.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.r
    }
}

fn initial_covariance(n: usize, eps: f64) -> DMatrix<f64> {
    DMatrix::identity(n, n) / eps
}

impl AdaptiveFilter for Rls {
    fn kind(&self) -> FilterKind {
        FilterKind::Rls
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

    fn reset_state(&mut self) {
        self.r = initial_covariance(self.base.n, self.eps);
    }
}

impl SampleStep for Rls {
    fn step(&mut self, d: f64, x: &[f64], _index: usize) -> Result<(f64, f64)> {
        let mu = self.base.mu;
        let y = dot(&self.base.w, x);
        let e = d - y;

        let xv = DVector::from_column_slice(x);
        let a = (&self.r * &xv).dot(&xv);
        let mut r1 = &self.r * a;
        let b = mu + self.r.tr_mul(&xv).dot(&xv);
        r1 /= b;
        self.r -= r1;
        self.r /= mu;

        let dw = &self.r * &xv;
        for (wi, dwi) in self.base.w.iter_mut().zip(dw.iter()) {
            *wi += e * dwi;
        }
        Ok((y, e))
    }
}

impl SampleFilter for Rls {
    fn adapt(&mut self, d: f64, x: &[f64]) {
        debug_assert_eq!(x.len(), self.base.n, "input length must equal filter length");
        let _ = self.step(d, x, 0);
    }

    fn run(&mut self, d: &[f64], x: &[Vec<f64>]) -> Result<RunOutput> {
        run_samples(self, d, x)
    }
}
