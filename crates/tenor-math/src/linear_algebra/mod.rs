//! Linear algebra utilities.
//!
//! Tridiagonal systems come from spline moments and implicit finite
//! differences; small dense systems from local polynomial fits.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Solves a tridiagonal system with the Thomas algorithm.
///
/// ```text
/// | b[0]  c[0]                 | | x[0]   |   | d[0]   |
/// | a[0]  b[1]  c[1]           | | x[1]   |   | d[1]   |
/// |       a[1]  b[2]  ...      | | ...    | = | ...    |
/// |             a[n-2] b[n-1]  | | x[n-1] |   | d[n-1] |
/// ```
///
/// `a` is the sub-diagonal and `c` the super-diagonal, each of length `n - 1`.
pub fn solve_tridiagonal(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> MathResult<Vec<f64>> {
    let n = b.len();
    if n == 0 {
        return Ok(vec![]);
    }
    if a.len() != n - 1 || c.len() != n - 1 || d.len() != n {
        return Err(MathError::invalid_input(
            "tridiagonal system has inconsistent dimensions",
        ));
    }
    if b[0].abs() < 1e-300 {
        return Err(MathError::SingularMatrix);
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    if n > 1 {
        c_prime[0] = c[0] / b[0];
    }
    d_prime[0] = d[0] / b[0];

    for i in 1..n {
        let denom = b[i] - a[i - 1] * c_prime[i - 1];
        if denom.abs() < 1e-300 {
            return Err(MathError::SingularMatrix);
        }
        if i < n - 1 {
            c_prime[i] = c[i] / denom;
        }
        d_prime[i] = (d[i] - a[i - 1] * d_prime[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    Ok(x)
}

/// Solves a dense square system `A x = b` by LU with partial pivoting.
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return Err(MathError::invalid_input(format!(
            "system is {}x{} with rhs of length {}",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }
    a.clone().lu().solve(b).ok_or(MathError::SingularMatrix)
}

/// Coefficients `c[0] + c[1] x + ... + c[n-1] x^(n-1)` of the polynomial
/// through `n` points.
pub fn polynomial_through(xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
    let n = xs.len();
    if n == 0 || n != ys.len() {
        return Err(MathError::invalid_input(
            "polynomial fit needs matching, non-empty abscissae and ordinates",
        ));
    }
    let vandermonde = DMatrix::from_fn(n, n, |row, col| xs[row].powi(col as i32));
    let rhs = DVector::from_column_slice(ys);
    Ok(solve_dense(&vandermonde, &rhs)?.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tridiagonal() {
        // [2 1 0; 1 2 1; 0 1 2] x = [4 8 8] -> x = [1 2 3]
        let x = solve_tridiagonal(&[1.0, 1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0], &[4.0, 8.0, 8.0])
            .unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tridiagonal_dimension_check() {
        assert!(solve_tridiagonal(&[1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0], &[1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_polynomial_through_cubic() {
        let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x + 0.25 * x * x * x;
        let xs = [0.9, 1.0, 1.1, 1.2];
        let ys: Vec<f64> = xs.iter().map(|x| f(*x)).collect();
        let c = polynomial_through(&xs, &ys).unwrap();
        assert_relative_eq!(c[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(c[1], -2.0, epsilon = 1e-8);
        assert_relative_eq!(c[2], 0.5, epsilon = 1e-7);
        assert_relative_eq!(c[3], 0.25, epsilon = 1e-7);
    }

    #[test]
    fn test_singular_dense() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_column_slice(&[1.0, 2.0]);
        assert!(matches!(solve_dense(&a, &b), Err(MathError::SingularMatrix)));
    }
}
