//! Root-finding algorithms.
//!
//! - [`brent`]: bracketed, superlinear; the default for bootstrapping
//! - [`bisection`]: bracketed, linear; the fallback when Brent stalls
//! - [`secant`]: derivative-free, unbracketed; used for implied volatility
//!
//! All solvers stop when `|f(x)| < tolerance`. The bracketed methods also
//! stop when the bracket has shrunk to machine precision, returning the
//! best point with its residual so the caller can decide whether the
//! residual is acceptable.
//!
//! ```rust
//! use tenor_math::solvers::{brent, SolverConfig};
//!
//! let f = |x: f64| x * x - 2.0;
//! let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod bisection;
mod brent;
mod secant;

pub use bisection::bisection;
pub use brent::brent;
pub use secant::secant;

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Growth factor applied by [`expand_bracket`] at each attempt.
const BRACKET_GROWTH: f64 = 1.6;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance on `|f(x)|`.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

impl SolverResult {
    /// True if the residual is inside `tolerance`.
    #[must_use]
    pub fn is_within(&self, tolerance: f64) -> bool {
        self.residual.abs() <= tolerance
    }
}

/// Widens `[a, b]` geometrically until `f` changes sign across it.
///
/// Each attempt pushes the endpoint with the smaller `|f|` outward. When
/// `lower_limit` is given, the lower end is never moved below it; this
/// keeps discount factors and probabilities positive.
pub fn expand_bracket<F>(
    f: F,
    a: f64,
    b: f64,
    lower_limit: Option<f64>,
    max_attempts: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return Err(MathError::invalid_input("bracket endpoints must differ"));
    }
    let (mut lo, mut hi) = if a < b { (a, b) } else { (b, a) };
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    for _ in 0..max_attempts {
        if f_lo * f_hi <= 0.0 {
            return Ok((lo, hi));
        }
        let width = hi - lo;
        if f_lo.abs() < f_hi.abs() {
            let mut next = lo - BRACKET_GROWTH * width;
            if let Some(limit) = lower_limit {
                next = next.max(limit + 0.5 * (lo - limit));
            }
            lo = next;
            f_lo = f(lo);
        } else {
            hi += BRACKET_GROWTH * width;
            f_hi = f(hi);
        }
    }

    if f_lo * f_hi <= 0.0 {
        Ok((lo, hi))
    } else {
        Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_builder() {
        let config = SolverConfig::default()
            .with_tolerance(1e-12)
            .with_max_iterations(50);
        assert_eq!(config.tolerance, 1e-12);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_expand_bracket_upwards() {
        let f = |x: f64| x - 10.0;
        let (lo, hi) = expand_bracket(f, 0.0, 1.0, None, 20).unwrap();
        assert!(f(lo) * f(hi) <= 0.0);
    }

    #[test]
    fn test_expand_bracket_respects_lower_limit() {
        // root at 0.001, start bracket well above it
        let f = |x: f64| x.ln() - 0.001_f64.ln();
        let (lo, hi) = expand_bracket(f, 0.5, 1.0, Some(0.0), 60).unwrap();
        assert!(lo > 0.0);
        assert!(f(lo) * f(hi) <= 0.0);
        let root = brent(f, lo, hi, &SolverConfig::default()).unwrap();
        assert_relative_eq!(root.root, 0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_expand_bracket_gives_up() {
        let f = |x: f64| x * x + 1.0;
        assert!(matches!(
            expand_bracket(f, 0.0, 1.0, None, 5),
            Err(MathError::InvalidBracket { .. })
        ));
    }
}
