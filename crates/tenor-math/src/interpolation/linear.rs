//! Linear interpolation.

use super::Knots;
use crate::error::MathResult;
use crate::interpolation::Interpolator;

/// Piecewise-linear interpolation.
///
/// Extrapolation, when enabled, continues the first or last segment.
///
/// # Example
///
/// ```rust
/// use tenor_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    knots: Knots,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator over strictly increasing `xs`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, the lengths
    /// differ, or `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        Ok(Self {
            knots: Knots::new(xs, ys, 2)?,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.knots.allow_extrapolation = true;
        self
    }

    fn slope(&self, i: usize) -> f64 {
        let k = &self.knots;
        (k.ys[i + 1] - k.ys[i]) / (k.xs[i + 1] - k.xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        let i = self.knots.segment(x);
        Ok(self.knots.ys[i] + (x - self.knots.xs[i]) * self.slope(i))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        Ok(self.slope(self.knots.segment(x)))
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
