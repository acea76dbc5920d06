//! Natural cubic spline interpolation.

use super::Knots;
use crate::error::MathResult;
use crate::interpolation::Interpolator;
use crate::linear_algebra::solve_tridiagonal;

/// Natural cubic spline (zero second derivative at both ends).
///
/// Outside the knot range, when extrapolation is enabled, the spline
/// continues linearly with the end slope.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Knots,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Creates a natural cubic spline.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 3 points or unsorted `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let knots = Knots::new(xs, ys, 3)?;
        let y2s = second_derivatives(&knots.xs, &knots.ys)?;
        Ok(Self { knots, y2s })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.knots.allow_extrapolation = true;
        self
    }

    fn eval_inside(&self, x: f64) -> (f64, f64) {
        let k = &self.knots;
        let i = k.segment(x);
        let h = k.xs[i + 1] - k.xs[i];
        let a = (k.xs[i + 1] - x) / h;
        let b = (x - k.xs[i]) / h;
        let value = a * k.ys[i]
            + b * k.ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * h * h / 6.0;
        let slope = (k.ys[i + 1] - k.ys[i]) / h
            - (3.0 * a * a - 1.0) * h * self.y2s[i] / 6.0
            + (3.0 * b * b - 1.0) * h * self.y2s[i + 1] / 6.0;
        (value, slope)
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        let edge = x.clamp(self.min_x(), self.max_x());
        let (value, slope) = self.eval_inside(edge);
        Ok(value + slope * (x - edge))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.knots.check_range(x)?;
        let edge = x.clamp(self.min_x(), self.max_x());
        Ok(self.eval_inside(edge).1)
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

/// Solves the natural-spline moment equations for the interior knots.
fn second_derivatives(xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
    let n = xs.len();
    let m = n - 2;
    let mut lower = Vec::with_capacity(m.saturating_sub(1));
    let mut diag = Vec::with_capacity(m);
    let mut upper = Vec::with_capacity(m.saturating_sub(1));
    let mut rhs = Vec::with_capacity(m);

    for i in 1..n - 1 {
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        if i > 1 {
            lower.push(h0 / 6.0);
        }
        diag.push((h0 + h1) / 3.0);
        if i < n - 2 {
            upper.push(h1 / 6.0);
        }
        rhs.push((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
    }

    let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
    let mut y2s = Vec::with_capacity(n);
    y2s.push(0.0);
    y2s.extend(interior);
    y2s.push(0.0);
    Ok(y2s)
}
