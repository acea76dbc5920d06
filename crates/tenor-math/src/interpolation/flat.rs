//! Piecewise-constant interpolation.

use super::Knots;
use crate::error::MathResult;
use crate::interpolation::Interpolator;

/// Step interpolation: the value of the next knot at or after `x`.
///
/// This is the backward-flat convention used for hazard rates and forward
/// levels, where the quote at a pillar applies to the whole period ending
/// there. Extrapolation holds the end values.
#[derive(Debug, Clone)]
pub struct FlatInterpolator {
    knots: Knots,
}

impl FlatInterpolator {
    /// Creates a flat interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 1 point or unsorted `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        Ok(Self {
            knots: Knots::new(xs, ys, 1)?,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.knots.allow_extrapolation = true;
        self
    }
}

impl Interpolator for FlatInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        let xs = &self.knots.xs;
        let i = xs.partition_point(|knot| *knot < x).min(xs.len() - 1);
        Ok(self.knots.ys[i])
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        Ok(0.0)
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
