//! The capability traits shared by every adaptive filter and the streaming
//! loop that drives them.
//!
//! # Protocol
//!
//! ```text
//! for each sample i (in order):
//!     history[i] = w            (snapshot before the update)
//!     y[i]       = w · x[i]
//!     e[i]       = d[i] - y[i]
//!     w         += update(e[i], x[i], ...)
//! ```
//!
//! [`SampleFilter`] covers the per-sample algorithms (LMS, NLMS, RLS, AP);
//! [`BlockFilter`] covers FBLMS, which consumes whole blocks of `n` samples.

use core::fmt;

use crate::error::{Error, Result};
use crate::param::{self, ParamRange};
use crate::weights::WeightInit;

/// The five supported algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Least mean squares.
    Lms,
    /// Normalized least mean squares.
    Nlms,
    /// Recursive least squares.
    Rls,
    /// Affine projection.
    Ap,
    /// Frequency-domain block LMS.
    Fblms,
}

impl FilterKind {
    /// All kinds, in the order they are usually listed.
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Lms,
        FilterKind::Nlms,
        FilterKind::Rls,
        FilterKind::Ap,
        FilterKind::Fblms,
    ];

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Lms => "LMS",
            FilterKind::Nlms => "NLMS",
            FilterKind::Rls => "RLS",
            FilterKind::Ap => "AP",
            FilterKind::Fblms => "FBLMS",
        }
    }

    /// Lowercase identifier used in configuration files.
    pub fn id(self) -> &'static str {
        match self {
            FilterKind::Lms => "lms",
            FilterKind::Nlms => "nlms",
            FilterKind::Rls => "rls",
            FilterKind::Ap => "ap",
            FilterKind::Fblms => "fblms",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            FilterKind::Lms => "stochastic gradient descent on the instantaneous squared error",
            FilterKind::Nlms => "LMS with the step normalized by input power",
            FilterKind::Rls => "recursive least squares via the matrix inversion lemma",
            FilterKind::Ap => "affine projection over a sliding window of past inputs",
            FilterKind::Fblms => "block LMS computed with overlap-save FFTs",
        }
    }

    /// Bound on the step size `mu`.
    pub fn mu_range(self) -> ParamRange {
        match self {
            FilterKind::Lms => param::LMS_MU,
            FilterKind::Nlms => param::NLMS_MU,
            FilterKind::Rls => param::RLS_MU,
            FilterKind::Ap => param::AP_MU,
            FilterKind::Fblms => param::FBLMS_MU,
        }
    }

    /// Bound on the regularization `eps`, if the algorithm has one.
    pub fn eps_range(self) -> Option<ParamRange> {
        match self {
            FilterKind::Nlms => Some(param::NLMS_EPS),
            FilterKind::Rls => Some(param::RLS_EPS),
            FilterKind::Ap => Some(param::AP_EPS),
            FilterKind::Lms | FilterKind::Fblms => None,
        }
    }

    /// Whether the filter consumes blocks rather than single samples.
    pub fn is_block(self) -> bool {
        matches!(self, FilterKind::Fblms)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a filter's parameters: length, step size and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Filter length.
    pub n: usize,
    /// Step size.
    pub mu: f64,
    /// Current weights.
    pub weights: Vec<f64>,
}

/// Result of a batch run.
///
/// `T` is `f64` for per-sample filters and `Vec<f64>` (one block) for
/// block filters. `weight_history[i]` holds the weights *before* the update
/// for sample (or block) `i`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOutput<T = f64> {
    /// Filter outputs `y`.
    pub outputs: Vec<T>,
    /// Errors `e = d - y`.
    pub errors: Vec<T>,
    /// Weight snapshots, one per processed sample or block.
    pub weight_history: Vec<Vec<f64>>,
}

/// Output of [`BlockFilter::run_blocks`].
pub type BlockRunOutput = RunOutput<Vec<f64>>;

impl<T> RunOutput<T> {
    pub(crate) fn with_capacity(len: usize) -> Self {
        Self {
            outputs: Vec::with_capacity(len),
            errors: Vec::with_capacity(len),
            weight_history: Vec::with_capacity(len),
        }
    }

    /// Number of processed samples or blocks.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether nothing was processed.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Parameters and weight lifecycle common to every filter.
pub trait AdaptiveFilter {
    /// Which algorithm this is.
    fn kind(&self) -> FilterKind;

    /// Filter length `n` (block length for FBLMS).
    fn filter_len(&self) -> usize;

    /// Current step size `mu`.
    fn step_size(&self) -> f64;

    /// Change the step size, validating it against the algorithm's bound.
    fn set_step_size(&mut self, mu: f64) -> Result<()>;

    /// Current weights.
    fn weights(&self) -> &[f64];

    /// Replace the weights in place according to `init`.
    ///
    /// Auxiliary state (covariance, input history, overlap buffer) is left
    /// untouched; see [`reset_state`](Self::reset_state).
    fn init_weights(&mut self, init: &WeightInit) -> Result<()>;

    /// Return auxiliary state to its just-constructed value, keeping weights.
    fn reset_state(&mut self) {}

    /// `(n, mu, w)` at the time of the call.
    fn params(&self) -> FilterParams {
        FilterParams {
            n: self.filter_len(),
            mu: self.step_size(),
            weights: self.weights().to_vec(),
        }
    }
}

/// Filters that adapt on one input vector and one desired scalar at a time.
pub trait SampleFilter: AdaptiveFilter {
    /// Filter output for input `x` using the current weights.
    fn predict(&self, x: &[f64]) -> f64 {
        dot(self.weights(), x)
    }

    /// Update the weights from one `(d, x)` pair.
    ///
    /// There is no error channel: `x` must have length
    /// [`filter_len`](AdaptiveFilter::filter_len).
    fn adapt(&mut self, d: f64, x: &[f64]);

    /// Process `d` and the rows of `x` in order, recording outputs, errors
    /// and the weight history.
    ///
    /// Fails with [`Error::LengthMismatch`] before touching any state if
    /// `d` and `x` disagree in length or any row is not `n` long.
    fn run(&mut self, d: &[f64], x: &[Vec<f64>]) -> Result<RunOutput>;
}

/// Filters that adapt on whole blocks of `n` samples.
pub trait BlockFilter: AdaptiveFilter {
    /// Output block for input block `x` using the current weights and the
    /// stored previous block.
    fn predict_block(&self, x: &[f64]) -> Vec<f64>;

    /// Update the weights from one desired block and one input block.
    fn adapt_block(&mut self, d: &[f64], x: &[f64]);

    /// Process the blocks in order. Every block must be `n` long.
    fn run_blocks(&mut self, d: &[Vec<f64>], x: &[Vec<f64>]) -> Result<BlockRunOutput>;
}

/// One per-sample update, used by the shared streaming loop.
pub(crate) trait SampleStep: AdaptiveFilter {
    /// Apply the update for sample `index` and return `(y, e)`.
    fn step(&mut self, d: f64, x: &[f64], index: usize) -> Result<(f64, f64)>;
}

/// Check that `d` and `x` agree and that every row of `x` has `width` entries.
pub(crate) fn validate_rows(width: usize, d_len: usize, x: &[Vec<f64>]) -> Result<()> {
    if d_len != x.len() {
        return Err(Error::length_mismatch("desired vs input", x.len(), d_len));
    }
    if let Some(row) = x.iter().find(|row| row.len() != width) {
        return Err(Error::length_mismatch("input row", width, row.len()));
    }
    Ok(())
}

/// The streaming loop shared by LMS, NLMS, RLS and AP.
pub(crate) fn run_samples<F: SampleStep + ?Sized>(
    filter: &mut F,
    d: &[f64],
    x: &[Vec<f64>],
) -> Result<RunOutput> {
    validate_rows(filter.filter_len(), d.len(), x)?;

    let mut out = RunOutput::with_capacity(x.len());
    for (i, (&target, row)) in d.iter().zip(x).enumerate() {
        out.weight_history.push(filter.weights().to_vec());
        let (y, e) = filter.step(target, row, i)?;
        out.outputs.push(y);
        out.errors.push(e);
    }
    Ok(out)
}

/// Inner product over the common prefix of `a` and `b`.
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}
