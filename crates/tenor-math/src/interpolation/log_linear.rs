//! Log-linear interpolation.

use super::Knots;
use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Linear interpolation on `ln(y)`.
///
/// On discount factors this gives piecewise-constant forward rates; on
/// survival probabilities, piecewise-constant hazard rates. All `ys` must
/// be strictly positive.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    knots: Knots,
    log_ys: Vec<f64>,
}

impl LogLinearInterpolator {
    /// Creates a log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 2 points, unsorted `xs`, or any
    /// non-positive `y`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if let Some(y) = ys.iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {y}"
            )));
        }
        let log_ys = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            knots: Knots::new(xs, ys, 2)?,
            log_ys,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.knots.allow_extrapolation = true;
        self
    }

    fn log_slope(&self, i: usize) -> f64 {
        (self.log_ys[i + 1] - self.log_ys[i]) / (self.knots.xs[i + 1] - self.knots.xs[i])
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        let i = self.knots.segment(x);
        Ok((self.log_ys[i] + (x - self.knots.xs[i]) * self.log_slope(i)).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let y = self.interpolate(x)?;
        Ok(y * self.log_slope(self.knots.segment(x)))
    }

    fn allows_extrapolation(&self) -> bool {
        self.knots.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.knots.min_x()
    }

    fn max_x(&self) -> f64 {
        self.knots.max_x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_forward_between_pillars() {
        // flat 4% continuously compounded curve
        let xs = vec![0.0, 1.0, 2.0];
        let ys: Vec<f64> = xs.iter().map(|t: &f64| (-0.04 * t).exp()).collect();
        let interp = LogLinearInterpolator::new(xs, ys).unwrap();
        assert_relative_eq!(
            interp.interpolate(1.5).unwrap(),
            (-0.06_f64).exp(),
            epsilon = 1e-14
        );
        let df = interp.interpolate(0.7).unwrap();
        assert_relative_eq!(interp.derivative(0.7).unwrap(), -0.04 * df, epsilon = 1e-14);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
    }
}
