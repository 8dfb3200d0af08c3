//! Ajuste Core - adaptive filters over in-memory sample streams
//!
//! This crate implements five classic adaptive filters behind a shared
//! weight lifecycle and streaming protocol, plus a learning-rate explorer
//! that sweeps the step size and scores each candidate.
//!
//! # Core Abstractions
//!
//! ## Filter Traits
//!
//! - [`AdaptiveFilter`] - Length, step size, weights and their initialisation
//! - [`SampleFilter`] - Per-sample `predict` / `adapt` / `run`
//! - [`BlockFilter`] - Per-block `predict_block` / `adapt_block` / `run_blocks`
//! - [`AnyFilter`] - Runtime choice of algorithm
//!
//! ## Algorithms
//!
//! - [`Lms`] - Least mean squares
//! - [`Nlms`] - Normalized LMS
//! - [`Rls`] - Recursive least squares with forgetting factor
//! - [`Ap`] - Affine projection with a regularized solve
//! - [`Fblms`] - Frequency-domain block LMS (overlap-save)
//!
//! ## Weights and Parameters
//!
//! - [`WeightInit`] - `zeros`, `random` (Gaussian, σ = 0.5) or explicit values
//! - [`ParamRange`] - Per-algorithm bounds on `mu` and `eps`
//!
//! ## Exploration
//!
//! - [`explore_learning`] / [`explore_learning_blocks`] - Step-size sweeps
//! - [`pre_trained_run`] / [`pre_trained_run_blocks`] - Train, then evaluate
//! - [`ErrorMetric`], [`mean_error`], [`linspace`] - Scoring helpers
//!
//! # Example
//!
//! ```rust
//! use ajuste_core::{AdaptiveFilter, Nlms, SampleFilter, WeightInit};
//!
//! let mut filter = Nlms::new(2, 0.5, 1e-6, WeightInit::Zeros).unwrap();
//! let x = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
//! let d = [0.5, -0.25, 0.25];
//!
//! let out = filter.run(&d, &x).unwrap();
//! assert_eq!(out.len(), 3);
//! assert_eq!(out.weight_history[0], vec![0.0, 0.0]);
//! ```
//!
//! # Features
//!
//! - `tracing` - Emit `tracing` debug events on construction, weight
//!   re-initialisation, explorer candidates and singular AP solves.

pub mod any;
pub mod ap;
pub mod error;
pub mod explore;
pub mod fblms;
pub mod filter;
pub mod lms;
pub mod metrics;
pub mod nlms;
pub mod param;
pub mod rls;
pub mod weights;

pub use any::AnyFilter;
pub use ap::Ap;
pub use error::{Error, Result};
pub use explore::{
    Exploration, ExploreOptions, explore_learning, explore_learning_blocks, pre_trained_run,
    pre_trained_run_blocks,
};
pub use fblms::Fblms;
pub use filter::{
    AdaptiveFilter, BlockFilter, BlockRunOutput, FilterKind, FilterParams, RunOutput,
    SampleFilter,
};
pub use lms::Lms;
pub use metrics::{ErrorMetric, linspace, mae, mean_error, mse, rmse};
pub use nlms::Nlms;
pub use param::{ParamRange, check_float_param, check_int_param};
pub use rls::Rls;
pub use weights::{RANDOM_STD_DEV, WeightInit};

pub use nalgebra::{DMatrix, DVector};
pub use rand::SeedableRng;
pub use rand::rngs::StdRng;
