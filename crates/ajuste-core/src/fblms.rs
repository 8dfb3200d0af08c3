//! FBLMS (Frequency-Domain Block LMS) adaptive filter.
//!
//! FBLMS processes blocks of `n` samples and computes both the filter output
//! (a linear convolution) and the gradient (a linear correlation) with FFTs
//! of length `2n`, using the overlap-save method:
//!
//! ```text
//! U   = FFT(previous block ++ current block)
//! W   = FFT(w[..n] ++ 0ₙ)
//! y   = IFFT(W ⊙ U)[n..2n]                  (second half is valid)
//! e   = d - y
//! φ   = IFFT(FFT(0ₙ ++ e) ⊙ conj(U))[..n]   (first half is valid)
//! w   = Re IFFT(W + μ FFT(φ ++ 0ₙ))
//! ```
//!
//! Each block costs O(n log n) instead of the O(n²) of running a
//! time-domain LMS over the same samples, at the price of one block of
//! latency.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{Error, Result};
use crate::filter::{AdaptiveFilter, BlockFilter, BlockRunOutput, FilterKind};
use crate::param;
use crate::weights::{FilterBase, WeightInit, entropy_rng};

/// Frequency-domain block LMS adaptive filter.
///
/// The weight vector is `2n` long: the first `n` entries are the active
/// taps, the last `n` are padding that starts at zero. Explicit initial
/// weights supply the `n` active taps.
#[derive(Clone)]
pub struct Fblms {
    base: FilterBase,
    /// The previous input block.
    overlap: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
}

impl Fblms {
    /// Create an FBLMS filter with block length `n`, seeding its random
    /// source from the OS.
    pub fn new(n: usize, mu: f64, init: impl Into<WeightInit>) -> Result<Self> {
        Self::with_rng(n, mu, init, entropy_rng())
    }

    /// Create an FBLMS filter with an explicit random source.
    pub fn with_rng(n: usize, mu: f64, init: impl Into<WeightInit>, rng: StdRng) -> Result<Self> {
        let base = FilterBase::with_padding(
            FilterKind::Fblms,
            n,
            mu,
            param::FBLMS_MU,
            &init.into(),
            rng,
            n,
        )?;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(2 * base.n);
        let ifft = planner.plan_fft_inverse(2 * base.n);
        Ok(Self {
            overlap: vec![0.0; base.n],
            base,
            fft,
            ifft,
        })
    }

    /// The active taps (first half of the weight vector).
    pub fn active_weights(&self) -> &[f64] {
        &self.base.w[..self.base.n]
    }

    /// The stored previous input block.
    pub fn overlap(&self) -> &[f64] {
        &self.overlap
    }

    /// FFT of `head ++ tail`, both real.
    fn forward_real(&self, head: &[f64], tail: &[f64]) -> Vec<Complex<f64>> {
        let buffer = head
            .iter()
            .chain(tail)
            .map(|&v| Complex::new(v, 0.0))
            .collect();
        self.forward(buffer)
    }

    fn forward(&self, mut buffer: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
        self.fft.process(&mut buffer);
        buffer
    }

    /// Normalized inverse FFT.
    fn inverse(&self, mut buffer: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
        self.ifft.process(&mut buffer);
        let scale = 1.0 / buffer.len() as f64;
        for c in &mut buffer {
            *c *= scale;
        }
        buffer
    }

    /// Spectrum of the zero-padded active taps.
    fn weight_spectrum(&self) -> Vec<Complex<f64>> {
        let n = self.base.n;
        self.forward_real(&self.base.w[..n], &vec![0.0; n])
    }

    /// Output block for `u = FFT(overlap ++ x)`.
    fn output(&self, w_spec: &[Complex<f64>], u: &[Complex<f64>]) -> Vec<f64> {
        let y = self.inverse(w_spec.iter().zip(u).map(|(w, u)| w * u).collect());
        y[self.base.n..].iter().map(|c| c.re).collect()
    }

    /// Process one block, returning `(y, e)`.
    fn step_block(&mut self, d: &[f64], x: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = self.base.n;
        let zeros = vec![0.0; n];

        let mut w_spec = self.weight_spectrum();
        let u = self.forward_real(&self.overlap, x);
        let y = self.output(&w_spec, &u);
        let e: Vec<f64> = d.iter().zip(&y).map(|(d, y)| d - y).collect();

        let e_spec = self.forward_real(&zeros, &e);
        let phi = self.inverse(e_spec.iter().zip(&u).map(|(e, u)| e * u.conj()).collect());

        // w is unchanged since w_spec was taken, so w_spec is also the
        // spectrum the update starts from.
        let mut phi_padded = phi;
        phi_padded.truncate(n);
        phi_padded.resize(2 * n, Complex::new(0.0, 0.0));
        let phi_spec = self.forward(phi_padded);
        for (w, p) in w_spec.iter_mut().zip(phi_spec) {
            *w += p * self.base.mu;
        }
        let updated = self.inverse(w_spec);
        for (wi, c) in self.base.w.iter_mut().zip(updated) {
            *wi = c.re;
        }

        self.overlap.copy_from_slice(x);
        (y, e)
    }

    fn validate_blocks(&self, d: &[Vec<f64>], x: &[Vec<f64>]) -> Result<()> {
        let n = self.base.n;
        if d.len() != x.len() {
            return Err(Error::length_mismatch("desired vs input blocks", x.len(), d.len()));
        }
        if let Some(block) = x.iter().find(|b| b.len() != n) {
            return Err(Error::length_mismatch("input block", n, block.len()));
        }
        if let Some(block) = d.iter().find(|b| b.len() != n) {
            return Err(Error::length_mismatch("desired block", n, block.len()));
        }
        Ok(())
    }
}

impl fmt::Debug for Fblms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fblms")
            .field("base", &self.base)
            .field("overlap", &self.overlap)
            .finish_non_exhaustive()
    }
}

impl AdaptiveFilter for Fblms {
    fn kind(&self) -> FilterKind {
        FilterKind::Fblms
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
        self.overlap.fill(0.0);
    }
}

impl BlockFilter for Fblms {
    /// # Panics
    ///
    /// Panics if `x` is not exactly `n` samples long.
    fn predict_block(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.base.n, "block length must equal filter length");
        let u = self.forward_real(&self.overlap, x);
        self.output(&self.weight_spectrum(), &u)
    }

    /// # Panics
    ///
    /// Panics if `d` or `x` is not exactly `n` samples long. Use
    /// [`run_blocks`](BlockFilter::run_blocks) to get a length mismatch as an
    /// error instead.
    fn adapt_block(&mut self, d: &[f64], x: &[f64]) {
        assert_eq!(x.len(), self.base.n, "block length must equal filter length");
        assert_eq!(d.len(), self.base.n, "block length must equal filter length");
        self.step_block(d, x);
    }

    fn run_blocks(&mut self, d: &[Vec<f64>], x: &[Vec<f64>]) -> Result<BlockRunOutput> {
        self.validate_blocks(d, x)?;

        let mut out = BlockRunOutput::with_capacity(x.len());
        for (target, block) in d.iter().zip(x) {
            out.weight_history.push(self.active_weights().to_vec());
            let (y, e) = self.step_block(target, block);
            out.outputs.push(y);
            out.errors.push(e);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct linear convolution of `w` with the last `2n` inputs,
    /// evaluated at the `n` newest positions.
    fn direct_output(w: &[f64], prev: &[f64], cur: &[f64]) -> Vec<f64> {
        let n = w.len();
        let seq: Vec<f64> = prev.iter().chain(cur).copied().collect();
        (0..n)
            .map(|i| (0..n).map(|k| w[k] * seq[n + i - k]).sum::<f64>())
            .collect()
    }

    #[test]
    fn weight_vector_is_double_length() {
        let filter = Fblms::new(4, 0.1, WeightInit::Zeros).unwrap();
        assert_eq!(filter.weights().len(), 8);
        assert_eq!(filter.filter_len(), 4);
        assert_eq!(filter.params().weights.len(), 8);
    }

    #[test]
    fn random_init_leaves_padding_zero() {
        use rand::SeedableRng;
        let filter = Fblms::with_rng(4, 0.1, WeightInit::Random, StdRng::seed_from_u64(3)).unwrap();
        assert!(filter.weights()[4..].iter().all(|&w| w == 0.0));
        assert!(filter.active_weights().iter().any(|&w| w != 0.0));
    }

    #[test]
    fn zero_block_leaves_weights_unchanged() {
        let mut filter = Fblms::new(8, 0.5, WeightInit::Zeros).unwrap();
        let zeros = vec![0.0; 8];
        let out = filter.run_blocks(&[zeros.clone()], &[zeros.clone()]).unwrap();
        assert!(out.outputs[0].iter().all(|y| y.abs() < 1e-15));
        assert!(filter.weights().iter().all(|w| w.abs() < 1e-15));
    }

    #[test]
    fn output_matches_linear_convolution() {
        let w = vec![0.5, -0.25, 0.125, 1.0];
        let mut filter = Fblms::new(4, 0.0, w.clone()).unwrap();
        let b0 = vec![1.0, 2.0, 3.0, 4.0];
        let b1 = vec![-1.0, 0.5, 0.0, 2.0];

        let y0 = filter.predict_block(&b0);
        let expected0 = direct_output(&w, &[0.0; 4], &b0);
        for (a, b) in y0.iter().zip(&expected0) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }

        // mu = 0: weights stay put and only the overlap advances.
        filter.adapt_block(&[0.0; 4], &b0);
        let y1 = filter.predict_block(&b1);
        let expected1 = direct_output(&w, &b0, &b1);
        for (a, b) in y1.iter().zip(&expected1) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
        assert_eq!(filter.overlap(), b0.as_slice());
    }

    #[test]
    fn overlap_is_replaced_not_accumulated() {
        let mut filter = Fblms::new(2, 0.01, WeightInit::Zeros).unwrap();
        filter.adapt_block(&[0.0, 0.0], &[1.0, 1.0]);
        filter.adapt_block(&[0.0, 0.0], &[3.0, 4.0]);
        assert_eq!(filter.overlap(), &[3.0, 4.0]);
    }

    #[test]
    fn identifies_fir_system() {
        let taps = [0.6, -0.2, 0.1, 0.05];
        let n = taps.len();
        let mut state = 11u32;
        let mut next = || {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 8) as f64 / f64::from(1u32 << 24) * 2.0 - 1.0
        };
        let signal: Vec<f64> = (0..4000).map(|_| next()).collect();
        let filtered: Vec<f64> = (0..signal.len())
            .map(|i| (0..n).filter(|&k| i >= k).map(|k| taps[k] * signal[i - k]).sum::<f64>())
            .collect();

        let x: Vec<Vec<f64>> = signal.chunks(n).map(<[f64]>::to_vec).collect();
        let d: Vec<Vec<f64>> = filtered.chunks(n).map(<[f64]>::to_vec).collect();

        let mut filter = Fblms::new(n, 0.05, WeightInit::Zeros).unwrap();
        filter.run_blocks(&d, &x).unwrap();
        for (w, t) in filter.active_weights().iter().zip(&taps) {
            assert!((w - t).abs() < 1e-2, "w = {w}, target = {t}");
        }
    }

    #[test]
    fn rejects_bad_block_length() {
        let mut filter = Fblms::new(4, 0.1, WeightInit::Zeros).unwrap();
        let err = filter
            .run_blocks(&[vec![0.0; 4]], &[vec![0.0; 3]])
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { what: "input block", .. }));

        let err = filter
            .run_blocks(&[vec![0.0; 4], vec![0.0; 4]], &[vec![0.0; 4]])
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn history_has_active_taps_per_block() {
        let mut filter = Fblms::new(3, 0.1, vec![0.1, 0.2, 0.3]).unwrap();
        let blocks = vec![vec![1.0, 0.0, -1.0]; 5];
        let out = filter.run_blocks(&blocks, &blocks).unwrap();
        assert_eq!(out.weight_history.len(), 5);
        assert!(out.weight_history.iter().all(|w| w.len() == 3));
        assert_eq!(out.weight_history[0], vec![0.1, 0.2, 0.3]);
    }

    #[test]
    #[should_panic(expected = "block length must equal filter length")]
    fn predict_block_panics_on_short_block() {
        let filter = Fblms::new(4, 0.1, WeightInit::Zeros).unwrap();
        let _ = filter.predict_block(&[1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "block length must equal filter length")]
    fn adapt_block_panics_on_long_block() {
        let mut filter = Fblms::new(4, 0.1, WeightInit::Zeros).unwrap();
        filter.adapt_block(&[0.0; 5], &[0.0; 5]);
    }
}
