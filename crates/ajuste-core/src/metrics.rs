//! Mean-error metrics and the step-size grid used by the explorer.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// How a sequence of errors is reduced to one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMetric {
    /// Mean absolute error.
    Mae,
    /// Mean squared error.
    #[default]
    Mse,
    /// Root mean squared error.
    Rmse,
}

impl ErrorMetric {
    /// Canonical uppercase name.
    pub fn name(self) -> &'static str {
        match self {
            ErrorMetric::Mae => "MAE",
            ErrorMetric::Mse => "MSE",
            ErrorMetric::Rmse => "RMSE",
        }
    }

    /// Score `observed` against `baseline`.
    pub fn evaluate(self, observed: &[f64], baseline: &[f64]) -> Result<f64> {
        match self {
            ErrorMetric::Mae => mae(observed, baseline),
            ErrorMetric::Mse => mse(observed, baseline),
            ErrorMetric::Rmse => rmse(observed, baseline),
        }
    }
}

impl FromStr for ErrorMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MAE" => Ok(ErrorMetric::Mae),
            "MSE" => Ok(ErrorMetric::Mse),
            "RMSE" => Ok(ErrorMetric::Rmse),
            _ => Err(Error::UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn differences<'a>(a: &'a [f64], b: &'a [f64]) -> Result<impl Iterator<Item = f64> + 'a> {
    if a.len() != b.len() {
        return Err(Error::length_mismatch("metric operands", a.len(), b.len()));
    }
    Ok(a.iter().zip(b).map(|(a, b)| a - b))
}

/// Mean absolute error. Empty input scores 0.
pub fn mae(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.is_empty() {
        return Ok(0.0);
    }
    Ok(differences(a, b)?.map(f64::abs).sum::<f64>() / a.len() as f64)
}

/// Mean squared error. Empty input scores 0.
pub fn mse(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.is_empty() {
        return Ok(0.0);
    }
    Ok(differences(a, b)?.map(|e| e * e).sum::<f64>() / a.len() as f64)
}

/// Root mean squared error.
pub fn rmse(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(mse(a, b)?.sqrt())
}

/// Score by metric name (`"MAE"`, `"MSE"`, `"RMSE"`).
pub fn mean_error(observed: &[f64], baseline: &[f64], metric: &str) -> Result<f64> {
    metric.parse::<ErrorMetric>()?.evaluate(observed, baseline)
}

/// `count` evenly spaced values from `start` to `end` inclusive.
///
/// A single value is `end`; zero values is an empty vector.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let delta = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + delta * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_against_zero() {
        let e = [1.0, -2.0, 3.0, -4.0];
        let z = [0.0; 4];
        assert_eq!(mae(&e, &z).unwrap(), 2.5);
        assert_eq!(mse(&e, &z).unwrap(), 7.5);
        assert!((rmse(&e, &z).unwrap() - 7.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn metric_length_mismatch() {
        assert!(matches!(
            mse(&[1.0, 2.0], &[0.0]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn mean_error_by_name() {
        let e = [2.0, -2.0];
        let z = [0.0, 0.0];
        assert_eq!(mean_error(&e, &z, "MAE").unwrap(), 2.0);
        assert_eq!(mean_error(&e, &z, "MSE").unwrap(), 4.0);
        assert_eq!(mean_error(&e, &z, "RMSE").unwrap(), 2.0);
        assert_eq!(
            mean_error(&e, &z, "MAPE"),
            Err(Error::UnknownMetric("MAPE".to_string()))
        );
    }

    #[test]
    fn linspace_single_value_is_end() {
        assert_eq!(linspace(0.1, 0.9, 1), vec![0.9]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn linspace_is_inclusive_and_even() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn metric_parse_ignores_case() {
        assert_eq!("rmse".parse::<ErrorMetric>(), Ok(ErrorMetric::Rmse));
        assert_eq!("Mae".parse::<ErrorMetric>(), Ok(ErrorMetric::Mae));
    }

    #[test]
    fn metric_display_and_parse() {
        for metric in [ErrorMetric::Mae, ErrorMetric::Mse, ErrorMetric::Rmse] {
            assert_eq!(metric.to_string().parse::<ErrorMetric>(), Ok(metric));
        }
    }
}
