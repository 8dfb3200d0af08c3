//! Learning-rate exploration and pre-trained runs.
//!
//! [`explore_learning`] sweeps the step size over an evenly spaced grid.
//! For every candidate the filter is reset to zero weights and fresh
//! auxiliary state, trained for a number of passes over the leading share
//! of the data, run over that share once more, and scored by an
//! [`ErrorMetric`] on the errors of that last pass against a zero baseline:
//!
//! ```text
//! for mu in linspace(mu_start, mu_end, steps):
//!     w = 0, reset state, set mu
//!     repeat epochs: run(d[..k], x[..k])
//!     (_, e, _) = run(d[..k], x[..k])
//!     score = metric(e, 0)
//! ```
//!
//! where `k = floor(len * n_train)`. Scores come back in ascending step-size
//! order, paired with the candidates themselves.

use crate::error::{Error, Result};
use crate::filter::{AdaptiveFilter, BlockFilter, BlockRunOutput, RunOutput, SampleFilter};
use crate::metrics::{ErrorMetric, linspace, mse};
use crate::param::{ParamRange, check_float_param, check_int_param};
use crate::weights::WeightInit;

const TRAIN_SHARE: ParamRange = ParamRange::closed(0.0, 1.0);

/// Train/test split, pass count and scoring metric for a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExploreOptions {
    /// Share of the data used for training, in `[0, 1]`.
    pub n_train: f64,
    /// Training passes per candidate, at least one.
    pub epochs: usize,
    /// How the errors of the scoring pass are scored.
    pub metric: ErrorMetric,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            n_train: 0.5,
            epochs: 1,
            metric: ErrorMetric::Mse,
        }
    }
}

impl ExploreOptions {
    /// Half the data, one pass, MSE.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the training share.
    pub fn with_n_train(mut self, n_train: f64) -> Self {
        self.n_train = n_train;
        self
    }

    /// Set the number of training passes.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the scoring metric.
    pub fn with_metric(mut self, metric: ErrorMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the scoring metric by name; fails with [`Error::UnknownMetric`].
    pub fn with_metric_name(self, name: &str) -> Result<Self> {
        Ok(self.with_metric(name.parse()?))
    }

    fn validate(&self) -> Result<()> {
        check_float_param(self.n_train, TRAIN_SHARE, "n_train")?;
        check_int_param(self.epochs, 1, usize::MAX, "epochs")?;
        Ok(())
    }

    fn train_len(&self, len: usize) -> usize {
        (len as f64 * self.n_train).floor() as usize
    }
}

/// Scores of a learning-rate sweep.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Exploration {
    /// Score per candidate.
    pub errors: Vec<f64>,
    /// The candidates, ascending.
    pub step_sizes: Vec<f64>,
}

impl Exploration {
    /// `(mu, score)` with the smallest score. NaN scores are never chosen
    /// over finite ones.
    pub fn best(&self) -> Option<(f64, f64)> {
        self.step_sizes
            .iter()
            .copied()
            .zip(self.errors.iter().copied())
            .filter(|(_, score)| !score.is_nan())
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Iterate `(mu, score)` pairs in ascending step-size order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.step_sizes
            .iter()
            .copied()
            .zip(self.errors.iter().copied())
    }
}

/// Sweep the step size of a per-sample filter.
///
/// Leaves the filter configured with the last candidate and the weights it
/// learned. Fails on the first invalid candidate, failed run or bad option.
pub fn explore_learning<F: SampleFilter + ?Sized>(
    filter: &mut F,
    d: &[f64],
    x: &[Vec<f64>],
    mu_start: f64,
    mu_end: f64,
    steps: usize,
    options: &ExploreOptions,
) -> Result<Exploration> {
    options.validate()?;
    if d.len() != x.len() {
        return Err(Error::length_mismatch("desired vs input", x.len(), d.len()));
    }
    let k = options.train_len(d.len());
    let (d_train, x_train) = (&d[..k], &x[..k]);

    sweep(filter, mu_start, mu_end, steps, |filter| {
        for _ in 0..options.epochs {
            filter.run(d_train, x_train)?;
        }
        let errors = filter.run(d_train, x_train)?.errors;
        options.metric.evaluate(&errors, &vec![0.0; errors.len()])
    })
}

/// Sweep the step size of a block filter.
///
/// Each block's errors are first reduced to their MSE; the metric is then
/// taken over the per-block values.
pub fn explore_learning_blocks<F: BlockFilter + ?Sized>(
    filter: &mut F,
    d: &[Vec<f64>],
    x: &[Vec<f64>],
    mu_start: f64,
    mu_end: f64,
    steps: usize,
    options: &ExploreOptions,
) -> Result<Exploration> {
    options.validate()?;
    if d.len() != x.len() {
        return Err(Error::length_mismatch(
            "desired vs input blocks",
            x.len(),
            d.len(),
        ));
    }
    let k = options.train_len(d.len());
    let (d_train, x_train) = (&d[..k], &x[..k]);

    sweep(filter, mu_start, mu_end, steps, |filter| {
        for _ in 0..options.epochs {
            filter.run_blocks(d_train, x_train)?;
        }
        let errors = filter.run_blocks(d_train, x_train)?.errors;
        let per_block = errors
            .iter()
            .map(|block| mse(block, &vec![0.0; block.len()]))
            .collect::<Result<Vec<_>>>()?;
        options.metric.evaluate(&per_block, &vec![0.0; per_block.len()])
    })
}

fn sweep<F: AdaptiveFilter + ?Sized>(
    filter: &mut F,
    mu_start: f64,
    mu_end: f64,
    steps: usize,
    mut score: impl FnMut(&mut F) -> Result<f64>,
) -> Result<Exploration> {
    let step_sizes = linspace(mu_start, mu_end, steps);
    let mut errors = Vec::with_capacity(step_sizes.len());

    for &mu in &step_sizes {
        filter.init_weights(&WeightInit::Zeros)?;
        filter.reset_state();
        filter.set_step_size(mu)?;
        let e = score(&mut *filter)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(filter = %filter.kind(), mu, score = e, "explored step size");

        errors.push(e);
    }

    Ok(Exploration { errors, step_sizes })
}

/// Train for `epochs` passes on the leading `n_train` share of the data,
/// then run once over the held-out remainder and return that run.
///
/// The weights and state carry over from training into the evaluation
/// pass; nothing is reset.
pub fn pre_trained_run<F: SampleFilter + ?Sized>(
    filter: &mut F,
    d: &[f64],
    x: &[Vec<f64>],
    n_train: f64,
    epochs: usize,
) -> Result<RunOutput> {
    let options = ExploreOptions::new()
        .with_n_train(n_train)
        .with_epochs(epochs);
    options.validate()?;
    if d.len() != x.len() {
        return Err(Error::length_mismatch("desired vs input", x.len(), d.len()));
    }
    let k = options.train_len(d.len());
    for _ in 0..epochs {
        filter.run(&d[..k], &x[..k])?;
    }
    filter.run(&d[k..], &x[k..])
}

/// [`pre_trained_run`] for block filters.
pub fn pre_trained_run_blocks<F: BlockFilter + ?Sized>(
    filter: &mut F,
    d: &[Vec<f64>],
    x: &[Vec<f64>],
    n_train: f64,
    epochs: usize,
) -> Result<BlockRunOutput> {
    let options = ExploreOptions::new()
        .with_n_train(n_train)
        .with_epochs(epochs);
    options.validate()?;
    if d.len() != x.len() {
        return Err(Error::length_mismatch(
            "desired vs input blocks",
            x.len(),
            d.len(),
        ));
    }
    let k = options.train_len(d.len());
    for _ in 0..epochs {
        filter.run_blocks(&d[..k], &x[..k])?;
    }
    filter.run_blocks(&d[k..], &x[k..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fblms::Fblms;
    use crate::lms::Lms;
    use crate::nlms::Nlms;

    // Two-tap system y = 0.8 x[0] - 0.3 x[1] driven by a deterministic
    // pseudo-random sequence.
    fn identification_data(len: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
        let mut state = 12345u64;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0
        };
        let signal: Vec<f64> = (0..len + 1).map(|_| next()).collect();
        let x: Vec<Vec<f64>> = (0..len).map(|i| vec![signal[i + 1], signal[i]]).collect();
        let d = x.iter().map(|r| 0.8 * r[0] - 0.3 * r[1]).collect();
        (d, x)
    }

    #[test]
    fn single_step_returns_end() {
        let (d, x) = identification_data(20);
        let mut f = Lms::new(2, 0.1, WeightInit::Zeros).unwrap();
        let ex = explore_learning(&mut f, &d, &x, 0.01, 0.5, 1, &ExploreOptions::new()).unwrap();
        assert_eq!(ex.step_sizes, vec![0.5]);
        assert_eq!(ex.errors.len(), 1);
    }

    #[test]
    fn step_sizes_ascend_evenly() {
        let (d, x) = identification_data(40);
        let mut f = Lms::new(2, 0.1, WeightInit::Zeros).unwrap();
        let ex = explore_learning(&mut f, &d, &x, 0.0, 1.0, 5, &ExploreOptions::new()).unwrap();
        assert_eq!(ex.step_sizes.len(), 5);
        for pair in ex.step_sizes.windows(2) {
            assert!((pair[1] - pair[0] - 0.25).abs() < 1e-12);
        }
        assert_eq!(ex.step_sizes[0], 0.0);
        assert_eq!(ex.step_sizes[4], 1.0);
    }

    #[test]
    fn zero_step_size_scores_worst() {
        let (d, x) = identification_data(400);
        let mut f = Lms::new(2, 0.1, WeightInit::Random).unwrap();
        let ex = explore_learning(&mut f, &d, &x, 0.0, 0.5, 6, &ExploreOptions::new()).unwrap();
        let (mu, _) = ex.best().unwrap();
        assert!(mu > 0.0);
        assert!(ex.errors[0] > ex.errors[5]);
    }

    #[test]
    fn every_candidate_starts_from_zero_weights() {
        let (d, x) = identification_data(100);
        let mut f = Nlms::new(2, 0.5, 1e-6, WeightInit::Zeros).unwrap();
        let once = explore_learning(&mut f, &d, &x, 0.5, 0.5, 1, &ExploreOptions::new()).unwrap();
        let twice = explore_learning(&mut f, &d, &x, 0.5, 0.5, 1, &ExploreOptions::new()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn candidate_outside_range_fails() {
        let (d, x) = identification_data(10);
        let mut f = Lms::new(2, 0.1, WeightInit::Zeros).unwrap();
        let err = explore_learning(&mut f, &d, &x, 1.0, 3.0, 3, &ExploreOptions::new());
        assert!(matches!(err, Err(Error::ParameterOutOfRange { name: "mu", .. })));
    }

    #[test]
    fn score_comes_from_pass_after_training() {
        let (d, x) = identification_data(40);
        let options = ExploreOptions::new().with_epochs(1);
        let mut f = Lms::new(2, 0.3, WeightInit::Zeros).unwrap();
        let ex = explore_learning(&mut f, &d, &x, 0.3, 0.3, 1, &options).unwrap();

        let mut replay = Lms::new(2, 0.3, WeightInit::Zeros).unwrap();
        let first = replay.run(&d[..20], &x[..20]).unwrap();
        let second = replay.run(&d[..20], &x[..20]).unwrap();
        let expected = mse(&second.errors, &[0.0; 20]).unwrap();
        assert_eq!(ex.errors, vec![expected]);
        assert!(ex.errors[0] < mse(&first.errors, &[0.0; 20]).unwrap());
    }

    #[test]
    fn block_score_comes_from_pass_after_training() {
        let (d, x) = identification_data(64);
        let to_blocks = |v: &[f64]| v.chunks(4).map(<[f64]>::to_vec).collect::<Vec<_>>();
        let x0: Vec<f64> = x.iter().map(|r| r[0]).collect();
        let (db, xb) = (to_blocks(&d), to_blocks(&x0));
        let options = ExploreOptions::new().with_epochs(2);

        let mut f = Fblms::new(4, 0.05, WeightInit::Zeros).unwrap();
        let ex = explore_learning_blocks(&mut f, &db, &xb, 0.05, 0.05, 1, &options).unwrap();

        let mut replay = Fblms::new(4, 0.05, WeightInit::Zeros).unwrap();
        for _ in 0..2 {
            replay.run_blocks(&db[..8], &xb[..8]).unwrap();
        }
        let last = replay.run_blocks(&db[..8], &xb[..8]).unwrap();
        let per_block: Vec<f64> = last
            .errors
            .iter()
            .map(|e| mse(e, &vec![0.0; e.len()]).unwrap())
            .collect();
        let expected = mse(&per_block, &vec![0.0; per_block.len()]).unwrap();
        assert_eq!(ex.errors, vec![expected]);
    }

    #[test]
    fn unknown_metric_name() {
        let err = ExploreOptions::new().with_metric_name("R2").unwrap_err();
        assert_eq!(err, Error::UnknownMetric("R2".to_string()));
    }

    #[test]
    fn invalid_options_rejected() {
        let (d, x) = identification_data(10);
        let mut f = Lms::new(2, 0.1, WeightInit::Zeros).unwrap();
        let bad_share = ExploreOptions::new().with_n_train(1.5);
        assert!(explore_learning(&mut f, &d, &x, 0.1, 0.2, 2, &bad_share).is_err());
        let no_epochs = ExploreOptions::new().with_epochs(0);
        assert!(explore_learning(&mut f, &d, &x, 0.1, 0.2, 2, &no_epochs).is_err());
    }

    #[test]
    fn length_mismatch_detected_before_sweep() {
        let (d, x) = identification_data(10);
        let mut f = Lms::new(2, 0.1, WeightInit::Zeros).unwrap();
        let err = explore_learning(&mut f, &d[..9], &x, 0.1, 0.2, 2, &ExploreOptions::new());
        assert!(matches!(err, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn best_skips_nan() {
        let ex = Exploration {
            errors: vec![f64::NAN, 0.3, 0.1],
            step_sizes: vec![0.0, 0.5, 1.0],
        };
        assert_eq!(ex.best(), Some((1.0, 0.1)));
        assert_eq!(Exploration::default().best(), None);
    }

    #[test]
    fn pre_trained_run_evaluates_held_out_part() {
        let (d, x) = identification_data(100);
        let mut f = Lms::new(2, 0.5, WeightInit::Zeros).unwrap();
        let out = pre_trained_run(&mut f, &d, &x, 0.8, 3).unwrap();
        assert_eq!(out.len(), 20);
        let tail_mse = mse(&out.errors, &[0.0; 20]).unwrap();
        assert!(tail_mse < 1e-4, "held-out mse {tail_mse}");
    }

    #[test]
    fn block_sweep() {
        let (d, x) = identification_data(256);
        let to_blocks = |v: &[f64]| v.chunks(4).map(<[f64]>::to_vec).collect::<Vec<_>>();
        let x0: Vec<f64> = x.iter().map(|r| r[0]).collect();
        let (db, xb) = (to_blocks(&d), to_blocks(&x0));

        let mut f = Fblms::new(4, 0.1, WeightInit::Zeros).unwrap();
        let ex = explore_learning_blocks(&mut f, &db, &xb, 0.0, 0.1, 3, &ExploreOptions::new())
            .unwrap();
        assert_eq!(ex.step_sizes.len(), 3);
        assert!(ex.errors[2] < ex.errors[0]);

        let out = pre_trained_run_blocks(&mut f, &db, &xb, 0.5, 1).unwrap();
        assert_eq!(out.len(), 32);
    }
}
