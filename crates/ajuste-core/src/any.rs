//! A sum type over the five filters.

use crate::ap::Ap;
use crate::error::Result;
use crate::fblms::Fblms;
use crate::filter::{AdaptiveFilter, BlockFilter, FilterKind, SampleFilter};
use crate::lms::Lms;
use crate::nlms::Nlms;
use crate::rls::Rls;
use crate::weights::WeightInit;

/// Any adaptive filter, selected at runtime.
///
/// Per-sample variants are reachable through [`as_sample_mut`](Self::as_sample_mut),
/// the block variant through [`as_block_mut`](Self::as_block_mut).
#[derive(Debug, Clone)]
pub enum AnyFilter {
    /// Least mean squares.
    Lms(Lms),
    /// Normalized least mean squares.
    Nlms(Nlms),
    /// Recursive least squares.
    Rls(Rls),
    /// Affine projection.
    Ap(Ap),
    /// Frequency-domain block LMS.
    Fblms(Fblms),
}

impl AnyFilter {
    fn inner(&self) -> &dyn AdaptiveFilter {
        match self {
            AnyFilter::Lms(f) => f,
            AnyFilter::Nlms(f) => f,
            AnyFilter::Rls(f) => f,
            AnyFilter::Ap(f) => f,
            AnyFilter::Fblms(f) => f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn AdaptiveFilter {
        match self {
            AnyFilter::Lms(f) => f,
            AnyFilter::Nlms(f) => f,
            AnyFilter::Rls(f) => f,
            AnyFilter::Ap(f) => f,
            AnyFilter::Fblms(f) => f,
        }
    }

    /// The filter as a per-sample filter, unless it is FBLMS.
    pub fn as_sample_mut(&mut self) -> Option<&mut dyn SampleFilter> {
        match self {
            AnyFilter::Lms(f) => Some(f),
            AnyFilter::Nlms(f) => Some(f),
            AnyFilter::Rls(f) => Some(f),
            AnyFilter::Ap(f) => Some(f),
            AnyFilter::Fblms(_) => None,
        }
    }

    /// The filter as a block filter, if it is FBLMS.
    pub fn as_block_mut(&mut self) -> Option<&mut dyn BlockFilter> {
        match self {
            AnyFilter::Fblms(f) => Some(f),
            _ => None,
        }
    }
}

impl AdaptiveFilter for AnyFilter {
    fn kind(&self) -> FilterKind {
        self.inner().kind()
    }

    fn filter_len(&self) -> usize {
        self.inner().filter_len()
    }

    fn step_size(&self) -> f64 {
        self.inner().step_size()
    }

    fn set_step_size(&mut self, mu: f64) -> Result<()> {
        self.inner_mut().set_step_size(mu)
    }

    fn weights(&self) -> &[f64] {
        self.inner().weights()
    }

    fn init_weights(&mut self, init: &WeightInit) -> Result<()> {
        self.inner_mut().init_weights(init)
    }

    fn reset_state(&mut self) {
        self.inner_mut().reset_state();
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for AnyFilter {
                fn from(filter: $variant) -> Self {
                    AnyFilter::$variant(filter)
                }
            }
        )*
    };
}

impl_from!(Lms, Nlms, Rls, Ap, Fblms);
