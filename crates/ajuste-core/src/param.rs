//! Hyperparameter bounds and range checks.
//!
//! Every filter validates its step size and algorithm-specific scalars at
//! construction time, and again whenever the step size is changed. The
//! bounds live here as [`ParamRange`] constants so the CLI can list them.

use core::fmt;

use crate::error::{Error, Result};

/// An interval a hyperparameter must fall within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Lower bound.
    pub low: f64,
    /// Upper bound (always inclusive).
    pub high: f64,
    /// Whether `low` itself is excluded.
    pub open_low: bool,
}

impl ParamRange {
    /// `[low, high]`.
    pub const fn closed(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            open_low: false,
        }
    }

    /// `(low, high]`.
    pub const fn left_open(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            open_low: true,
        }
    }

    /// Returns `true` if `value` lies inside the interval. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        let above = if self.open_low {
            value > self.low
        } else {
            value >= self.low
        };
        above && value <= self.high
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.open_low { '(' } else { '[' };
        write!(f, "{open}{}, {}]", self.low, self.high)
    }
}

/// Default step-size bound shared by filters without a tighter one.
pub const BASE_MU: ParamRange = ParamRange::closed(0.0, 1000.0);
/// LMS step size.
pub const LMS_MU: ParamRange = ParamRange::closed(0.0, 2.0);
/// NLMS step size.
pub const NLMS_MU: ParamRange = ParamRange::closed(0.0, 2.0);
/// NLMS normalization floor.
pub const NLMS_EPS: ParamRange = ParamRange::closed(0.0, 1.0);
/// RLS forgetting factor. Zero would divide the covariance by zero.
pub const RLS_MU: ParamRange = ParamRange::left_open(0.0, 1.0);
/// RLS initial covariance scale; the covariance starts at `(1/eps) I`.
pub const RLS_EPS: ParamRange = ParamRange::left_open(0.0, 1.0);
/// AP step size.
pub const AP_MU: ParamRange = ParamRange::closed(0.0, 1000.0);
/// AP regularization.
pub const AP_EPS: ParamRange = ParamRange::closed(0.0, 1000.0);
/// FBLMS step size.
pub const FBLMS_MU: ParamRange = BASE_MU;

/// Check that a float parameter lies in `range`, returning it unchanged.
pub fn check_float_param(value: f64, range: ParamRange, name: &'static str) -> Result<f64> {
    if range.contains(value) {
        Ok(value)
    } else {
        Err(Error::ParameterOutOfRange {
            name,
            value,
            range: range.to_string(),
        })
    }
}

/// Check that an integer parameter lies in `[low, high]`.
pub fn check_int_param(value: usize, low: usize, high: usize, name: &'static str) -> Result<usize> {
    if (low..=high).contains(&value) {
        Ok(value)
    } else {
        Err(Error::ParameterOutOfRange {
            name,
            value: value as f64,
            range: format!("[{low}, {high}]"),
        })
    }
}

/// Filter lengths and projection orders must be at least one.
pub(crate) fn check_len(value: usize, name: &'static str) -> Result<usize> {
    check_int_param(value, 1, usize::MAX, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_range_includes_both_ends() {
        let r = ParamRange::closed(0.0, 2.0);
        assert!(r.contains(0.0));
        assert!(r.contains(2.0));
        assert!(!r.contains(2.0001));
        assert!(!r.contains(-0.0001));
    }

    #[test]
    fn left_open_range_excludes_low() {
        let r = ParamRange::left_open(0.0, 1.0);
        assert!(!r.contains(0.0));
        assert!(r.contains(1e-12));
        assert!(r.contains(1.0));
    }

    #[test]
    fn nan_is_never_in_range() {
        assert!(!BASE_MU.contains(f64::NAN));
    }

    #[test]
    fn display_formats() {
        assert_eq!(LMS_MU.to_string(), "[0, 2]");
        assert_eq!(RLS_EPS.to_string(), "(0, 1]");
    }

    #[test]
    fn check_float_param_valid_and_invalid() {
        assert_eq!(check_float_param(1.5, BASE_MU, "mu"), Ok(1.5));
        let err = check_float_param(1.5, ParamRange::closed(0.0, 1.0), "mu").unwrap_err();
        assert!(matches!(err, Error::ParameterOutOfRange { name: "mu", .. }));
    }

    #[test]
    fn check_int_param_bounds() {
        assert_eq!(check_int_param(1, 0, 10, "order"), Ok(1));
        assert!(check_int_param(11, 0, 10, "order").is_err());
        assert!(check_len(0, "n").is_err());
    }
}
