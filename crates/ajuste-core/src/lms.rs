//! LMS (Least Mean Squares) adaptive filter.
//!
//! The LMS algorithm updates filter weights using a stochastic gradient
//! descent step on the instantaneous squared error:
//!
//! ```text
//! y     = w · x           (filter output)
//! e     = d - y           (error: desired minus output)
//! w[i] += μ * e * x[i]    (weight update for tap i)
//! ```
//!
//! Stability requires `0 < μ < 2 / (n * P_x)` where `P_x` is the input power;
//! the accepted range is `[0, 2]`.
//!
//! Reference: Haykin, "Adaptive Filter Theory" (5th ed.), chapter 5.

use rand::rngs::StdRng;

use crate::error::Result;
use crate::filter::{
    AdaptiveFilter, FilterKind, RunOutput, SampleFilter, SampleStep, dot, run_samples,
};
use crate::param;
use crate::weights::{FilterBase, WeightInit, entropy_rng};

/// Least Mean Squares adaptive filter.
///
/// ## Parameters
/// - `n`: filter length (number of taps)
/// - `mu`: step size μ in `[0, 2]`
/// - `init`: initial weight policy
///
/// ## Example
///
/// ```rust
/// use ajuste_core::{Lms, SampleFilter, AdaptiveFilter, WeightInit};
///
/// let mut filter = Lms::new(1, 1.0, WeightInit::Zeros).unwrap();
/// filter.adapt(5.0, &[1.0]);
/// assert_eq!(filter.weights(), &[5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Lms {
    base: FilterBase,
}

impl Lms {
    /// Create an LMS filter, seeding its random source from the OS.
    pub fn new(n: usize, mu: f64, init: impl Into<WeightInit>) -> Result<Self> {
        Self::with_rng(n, mu, init, entropy_rng())
    }

    /// Create an LMS filter with an explicit random source.
    pub fn with_rng(n: usize, mu: f64, init: impl Into<WeightInit>, rng: StdRng) -> Result<Self> {
        let base = FilterBase::new(FilterKind::Lms, n, mu, param::LMS_MU, &init.into(), rng)?;
        Ok(Self { base })
    }
}

impl AdaptiveFilter for Lms {
    fn kind(&self) -> FilterKind {
        FilterKind::Lms
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

impl SampleStep for Lms {
    fn step(&mut self, d: f64, x: &[f64], _index: usize) -> Result<(f64, f64)> {
        let w = &mut self.base.w;
        let y = dot(w, x);
        let e = d - y;

        let mu_e = self.base.mu * e;
        for (wi, &xi) in w.iter_mut().zip(x) {
            *wi += mu_e * xi;
        }
        Ok((y, e))
    }
}

impl SampleFilter for Lms {
    fn adapt(&mut self, d: f64, x: &[f64]) {
        debug_assert_eq!(x.len(), self.base.n, "input length must equal filter length");
        // The LMS step cannot fail.
        let _ = self.step(d, x, 0);
    }

    fn run(&mut self, d: &[f64], x: &[Vec<f64>]) -> Result<RunOutput> {
        run_samples(self, d, x)
    }
}
