//! One-dimensional interpolation.
//!
//! | Method | Continuity | Typical use |
//! |--------|------------|-------------|
//! | [`LinearInterpolator`] | C0 | zero rates, spreads, forward levels |
//! | [`LogLinearInterpolator`] | C0 | discount factors, survival probabilities |
//! | [`CubicSpline`] | C2 | smooth zero curves |
//! | [`FlatInterpolator`] | step | piecewise-constant hazard or forward levels |
//!
//! Every interpolator rejects queries outside `[min_x, max_x]` unless it was
//! built `with_extrapolation()`.

mod cubic_spline;
mod flat;
mod linear;
mod log_linear;

pub use cubic_spline::CubicSpline;
pub use flat::FlatInterpolator;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use std::cmp::Ordering;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Indices of the two knots strictly bracketing `x`.
///
/// Returns `None` when `x` coincides with a knot or lies outside the knot
/// range. Knots must be sorted ascending.
///
/// ```rust
/// use tenor_math::interpolation::bracketing_indices;
///
/// let xs = [0.0, 1.0, 2.0];
/// assert_eq!(bracketing_indices(&xs, 1.5), Some((1, 2)));
/// assert_eq!(bracketing_indices(&xs, 1.0), None);
/// ```
pub fn bracketing_indices(xs: &[f64], x: f64) -> Option<(usize, usize)> {
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(Ordering::Less)) {
        Ok(_) => None,
        Err(0) => None,
        Err(i) if i >= xs.len() => None,
        Err(i) => Some((i - 1, i)),
    }
}

/// Validated, strictly increasing knot set shared by the interpolators.
#[derive(Debug, Clone)]
pub(crate) struct Knots {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
    pub(crate) allow_extrapolation: bool,
}

impl Knots {
    pub(crate) fn new(xs: Vec<f64>, ys: Vec<f64>, min_points: usize) -> MathResult<Self> {
        if xs.len() < min_points {
            return Err(MathError::insufficient_data(min_points, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }
        Ok(Self {
            xs,
            ys,
            allow_extrapolation: false,
        })
    }

    pub(crate) fn min_x(&self) -> f64 {
        self.xs[0]
    }

    pub(crate) fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    pub(crate) fn check_range(&self, x: f64) -> MathResult<()> {
        if !self.allow_extrapolation && (x < self.min_x() || x > self.max_x()) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }
        Ok(())
    }

    /// Index `i` such that `xs[i] <= x < xs[i + 1]`, clamped to the end segments.
    pub(crate) fn segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        match self
            .xs
            .binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(Ordering::Equal))
        {
            Ok(i) => i.min(last),
            Err(i) => i.saturating_sub(1).min(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bracketing_indices() {
        let xs = [0.25, 1.0, 2.0, 5.0];
        assert_eq!(bracketing_indices(&xs, 0.5), Some((0, 1)));
        assert_eq!(bracketing_indices(&xs, 4.0), Some((2, 3)));
        assert_eq!(bracketing_indices(&xs, 2.0), None);
        assert_eq!(bracketing_indices(&xs, 0.1), None);
        assert_eq!(bracketing_indices(&xs, 7.0), None);
    }

    #[test]
    fn test_all_interpolators_through_points() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        let linear = LinearInterpolator::new(times.clone(), rates.clone()).unwrap();
        let spline = CubicSpline::new(times.clone(), rates.clone()).unwrap();
        let flat = FlatInterpolator::new(times.clone(), rates.clone()).unwrap();
        for (t, r) in times.iter().zip(rates.iter()) {
            assert_relative_eq!(linear.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
            assert_relative_eq!(spline.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
            assert_relative_eq!(flat.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
        }

        let dfs: Vec<f64> = times
            .iter()
            .zip(rates.iter())
            .map(|(t, r)| (-r * t).exp())
            .collect();
        let log_linear = LogLinearInterpolator::new(times.clone(), dfs.clone()).unwrap();
        for (t, df) in times.iter().zip(dfs.iter()) {
            assert_relative_eq!(log_linear.interpolate(*t).unwrap(), *df, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unsorted_knots_rejected() {
        assert!(LinearInterpolator::new(vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]).is_err());
        assert!(LinearInterpolator::new(vec![0.0, 1.0, 1.0], vec![0.0, 1.0, 2.0]).is_err());
    }
}
