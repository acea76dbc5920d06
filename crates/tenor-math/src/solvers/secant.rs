//! Secant root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Secant method from two starting points.
///
/// No bracket is needed. Fails with `InvalidInput` if two successive
/// function values coincide, since the secant line is then flat.
///
/// # Example
///
/// ```rust
/// use tenor_math::solvers::{secant, SolverConfig};
///
/// let result = secant(|x| x * x - 2.0, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<F>(f: F, x0: f64, x1: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut x_prev = x0;
    let mut x_curr = x1;
    let mut f_prev = f(x_prev);
    let mut f_curr = f(x_curr);

    for iteration in 0..config.max_iterations {
        if f_curr.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x_curr,
                iterations: iteration,
                residual: f_curr,
            });
        }

        let denom = f_curr - f_prev;
        if denom == 0.0 {
            return Err(MathError::invalid_input(format!(
                "secant is flat between {x_prev} and {x_curr}"
            )));
        }

        let x_next = x_curr - f_curr * (x_curr - x_prev) / denom;
        x_prev = x_curr;
        f_prev = f_curr;
        x_curr = x_next;
        f_curr = f(x_curr);
    }

    if f_curr.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x_curr,
            iterations: config.max_iterations,
            residual: f_curr,
        });
    }
    Err(MathError::convergence_failed(
        config.max_iterations,
        f_curr.abs(),
    ))
}
