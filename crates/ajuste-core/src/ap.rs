//! AP (Affine Projection) adaptive filter.
//!
//! AP generalises NLMS by projecting onto the last `order` input vectors at
//! once. The filter keeps a sliding window `X` (`n × order`, newest input in
//! column 0) and the matching desired values `D`:
//!
//! ```text
//! y  = Xᵀ w                        (order outputs across the window)
//! e  = D - y
//! Z  = solve((XᵀX + εI) Z = I)     (regularized normal equations)
//! w += μ X (Z e)
//! ```
//!
//! The solve replaces an explicit inverse so that a near-singular `XᵀX`
//! is handled through `ε`. With `ε = 0` the first `order - 1` samples leave
//! zero columns in `X` and the solve fails.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;

use crate::error::{Error, Result};
use crate::filter::{AdaptiveFilter, FilterKind, RunOutput, SampleFilter, SampleStep, run_samples};
use crate::param::{self, check_float_param, check_len};
use crate::weights::{FilterBase, WeightInit, entropy_rng};

/// Affine Projection adaptive filter.
///
/// `mu` lies in `[0, 1000]`, `eps` in `[0, 1000]`, `order >= 1`.
#[derive(Debug, Clone)]
pub struct Ap {
    base: FilterBase,
    order: usize,
    eps: f64,
    /// Input window, `n × order`. Column 0 is the newest sample.
    x_mem: DMatrix<f64>,
    /// Desired values matching the columns of `x_mem`.
    d_mem: DVector<f64>,
    eps_ide: DMatrix<f64>,
    ide: DMatrix<f64>,
}

impl Ap {
    /// Create an AP filter, seeding its random source from the OS.
    pub fn new(
        n: usize,
        mu: f64,
        order: usize,
        eps: f64,
        init: impl Into<WeightInit>,
    ) -> Result<Self> {
        Self::with_rng(n, mu, order, eps, init, entropy_rng())
    }

    /// Create an AP filter with an explicit random source.
    pub fn with_rng(
        n: usize,
        mu: f64,
        order: usize,
        eps: f64,
        init: impl Into<WeightInit>,
        rng: StdRng,
    ) -> Result<Self> {
        let order = check_len(order, "order")?;
        let eps = check_float_param(eps, param::AP_EPS, "eps")?;
        let base = FilterBase::new(FilterKind::Ap, n, mu, param::AP_MU, &init.into(), rng)?;
        let ide = DMatrix::identity(order, order);
        Ok(Self {
            x_mem: DMatrix::zeros(base.n, order),
            d_mem: DVector::zeros(order),
            eps_ide: &ide * eps,
            ide,
            base,
            order,
            eps,
        })
    }

    /// Projection order (window width).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Regularization ε.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// The input window `X`; column 0 holds the newest input.
    pub fn input_history(&self) -> &DMatrix<f64> {
        &self.x_mem
    }

    /// Desired values matching the columns of [`input_history`](Self::input_history).
    pub fn desired_history(&self) -> &DVector<f64> {
        &self.d_mem
    }

    /// Shift the window one column to the right, dropping the oldest
    /// column, and store `(d, x)` in column 0.
    fn push_sample(&mut self, d: f64, x: &[f64]) {
        for c in (1..self.order).rev() {
            self.x_mem.swap_columns(c, c - 1);
            self.d_mem.swap_rows(c, c - 1);
        }
        self.x_mem.set_column(0, &DVector::from_column_slice(x));
        self.d_mem[0] = d;
    }
}

impl AdaptiveFilter for Ap {
    fn kind(&self) -> FilterKind {
        FilterKind::Ap
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
        self.x_mem.fill(0.0);
        self.d_mem.fill(0.0);
    }
}

impl SampleStep for Ap {
    fn step(&mut self, d: f64, x: &[f64], index: usize) -> Result<(f64, f64)> {
        self.push_sample(d, x);

        let w = DVector::from_column_slice(&self.base.w);
        let y = self.x_mem.tr_mul(&w);
        let e = &self.d_mem - &y;

        let gram = self.x_mem.tr_mul(&self.x_mem) + &self.eps_ide;
        let Some(z) = gram.lu().solve(&self.ide) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(sample = index, "AP: regularized solve failed");
            return Err(Error::SingularSystem { sample: index });
        };

        // (e Z) Xᵀ as a column: X (Zᵀ e).
        let dw = &self.x_mem * z.tr_mul(&e) * self.base.mu;
        for (wi, dwi) in self.base.w.iter_mut().zip(dw.iter()) {
            *wi += dwi;
        }
        Ok((y[0], e[0]))
    }
}

impl SampleFilter for Ap {
    /// Update the weights from one `(d, x)` pair.
    ///
    /// # Panics
    ///
    /// Panics if the regularized normal equations are singular. Do not call
    /// `adapt` with inputs that make the solve singular (for example
    /// `eps = 0` with fewer than `order` distinct inputs seen); use
    /// [`run`](SampleFilter::run) to get the failure as an error instead.
    fn adapt(&mut self, d: f64, x: &[f64]) {
        debug_assert_eq!(x.len(), self.base.n, "input length must equal filter length");
        if let Err(err) = self.step(d, x, 0) {
            panic!("AP adapt: {err}");
        }
    }

    fn run(&mut self, d: &[f64], x: &[Vec<f64>]) -> Result<RunOutput> {
        run_samples(self, d, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_sample_in_column_zero() {
        let mut filter = Ap::new(2, 0.1, 3, 0.01, WeightInit::Zeros).unwrap();
        filter.adapt(1.0, &[1.0, 10.0]);
        filter.adapt(2.0, &[2.0, 20.0]);
        filter.adapt(3.0, &[3.0, 30.0]);
        filter.adapt(4.0, &[4.0, 40.0]);

        let x = filter.input_history();
        let column = |c: usize| x.column(c).iter().copied().collect::<Vec<_>>();
        assert_eq!(column(0), vec![4.0, 40.0]);
        assert_eq!(column(1), vec![3.0, 30.0]);
        assert_eq!(column(2), vec![2.0, 20.0]);
        assert_eq!(filter.desired_history().as_slice(), &[4.0, 3.0, 2.0]);
    }

    #[test]
    fn order_one_matches_regularized_nlms() {
        // With order 1, AP reduces to w += mu e x / (eps + x·x).
        let mut ap = Ap::new(2, 0.5, 1, 0.1, WeightInit::Zeros).unwrap();
        let x = [0.6, -0.8];
        ap.adapt(1.0, &x);
        let nu = 0.5 / (0.1 + 1.0);
        let expected = [nu * x[0], nu * x[1]];
        for (w, e) in ap.weights().iter().zip(&expected) {
            assert!((w - e).abs() < 1e-12, "w = {w}, expected {e}");
        }
    }

    #[test]
    fn singular_solve_is_an_error_in_run() {
        let mut filter = Ap::new(2, 0.5, 2, 0.0, WeightInit::Zeros).unwrap();
        let x = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let err = filter.run(&[1.0, 1.0], &x).unwrap_err();
        assert_eq!(err, Error::SingularSystem { sample: 0 });
    }

    #[test]
    #[should_panic]
    fn singular_solve_panics_in_adapt() {
        let mut filter = Ap::new(2, 0.5, 2, 0.0, WeightInit::Zeros).unwrap();
        filter.adapt(1.0, &[1.0, 0.0]);
    }

    #[test]
    fn rejects_zero_order() {
        let err = Ap::new(2, 0.5, 0, 0.1, WeightInit::Zeros).unwrap_err();
        assert!(matches!(err, Error::ParameterOutOfRange { name: "order", .. }));
    }

    #[test]
    fn run_reports_newest_output_and_error() {
        let mut filter = Ap::new(2, 0.2, 2, 0.1, vec![0.5, -0.5]).unwrap();
        let x = vec![vec![1.0, 2.0], vec![3.0, 1.0]];
        let out = filter.run(&[0.0, 1.0], &x).unwrap();
        // First sample: y = w · x0 = -0.5.
        assert!((out.outputs[0] + 0.5).abs() < 1e-12);
        assert!((out.errors[0] - 0.5).abs() < 1e-12);
        assert_eq!(out.weight_history[0], vec![0.5, -0.5]);
    }

    #[test]
    fn reset_state_clears_window() {
        let mut filter = Ap::new(2, 0.2, 2, 0.1, WeightInit::Zeros).unwrap();
        filter.adapt(1.0, &[1.0, 1.0]);
        filter.reset_state();
        assert!(filter.input_history().iter().all(|&v| v == 0.0));
        assert!(filter.desired_history().iter().all(|&v| v == 0.0));
    }
}
