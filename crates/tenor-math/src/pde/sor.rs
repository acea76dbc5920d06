//! Successive over-relaxation for the implicit half of the theta scheme.

use ndarray::Array1;

use crate::error::{MathError, MathResult};

/// Tridiagonal operator stored by diagonals, one entry per lattice node.
#[derive(Debug, Clone)]
pub(crate) struct Tridiagonal {
    pub(crate) sub: Array1<f64>,
    pub(crate) diag: Array1<f64>,
    pub(crate) sup: Array1<f64>,
}

impl Tridiagonal {
    /// Operator with the same coefficients on every node.
    pub(crate) fn constant(n: usize, sub: f64, diag: f64, sup: f64) -> Self {
        Self {
            sub: Array1::from_elem(n, sub),
            diag: Array1::from_elem(n, diag),
            sup: Array1::from_elem(n, sup),
        }
    }

    /// `self * values` on the interior nodes; the edges are left at zero.
    pub(crate) fn apply_interior(&self, values: &Array1<f64>) -> Array1<f64> {
        let n = values.len();
        let mut out = Array1::zeros(n);
        for i in 1..n - 1 {
            out[i] = self.sub[i] * values[i - 1]
                + self.diag[i] * values[i]
                + self.sup[i] * values[i + 1];
        }
        out
    }
}

/// Relaxation settings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Relaxation {
    pub(crate) omega: f64,
    pub(crate) tolerance: f64,
    pub(crate) max_iterations: u32,
}

/// Solves `system * values = rhs` on the interior nodes in place.
///
/// The edge values are boundary conditions and are not touched. When a
/// `floor` is given every update is projected onto it, which is the
/// early-exercise constraint. Returns the number of sweeps.
pub(crate) fn solve_projected(
    system: &Tridiagonal,
    rhs: &Array1<f64>,
    values: &mut Array1<f64>,
    floor: Option<&Array1<f64>>,
    relaxation: Relaxation,
) -> MathResult<u32> {
    let n = values.len();
    let mut error = f64::INFINITY;

    for sweep in 1..=relaxation.max_iterations {
        error = 0.0;
        for i in 1..n - 1 {
            let gauss_seidel = (rhs[i] - system.sup[i] * values[i + 1]
                - system.sub[i] * values[i - 1])
                / system.diag[i];
            let mut updated = values[i] + relaxation.omega * (gauss_seidel - values[i]);
            if let Some(floor) = floor {
                updated = updated.max(floor[i]);
            }
            let change = updated - values[i];
            error += change * change;
            values[i] = updated;
        }
        if error.sqrt() <= relaxation.tolerance {
            return Ok(sweep);
        }
    }

    log::warn!(
        "SOR did not converge in {} sweeps (residual {:.2e})",
        relaxation.max_iterations,
        error.sqrt()
    );
    Err(MathError::convergence_failed(
        relaxation.max_iterations,
        error.sqrt(),
    ))
}
