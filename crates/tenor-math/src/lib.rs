//! # Tenor Math
//!
//! Numerical routines behind the Tenor term-structure library.
//!
//! - **Solvers**: bracketed root finding (Brent, bisection) and the secant method
//! - **Interpolation**: linear, log-linear, natural cubic spline and flat step
//! - **Linear Algebra**: tridiagonal and small dense solves
//! - **PDE**: theta-scheme finite-difference grid for equity options with
//!   discrete dividends, SOR with early-exercise projection and Greeks
//!
//! Everything here works on plain `f64` time axes; dates and day counts are
//! handled by the curve layer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod pde;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, FlatInterpolator, Interpolator, LinearInterpolator, LogLinearInterpolator,
    };
    pub use crate::pde::{
        DividendSchedule, ExerciseStyle, FiniteDifferencePricer, Greeks, GridSpec, OptionSpec,
        Payoff, ZeroCurve, ZeroRateCurve,
    };
    pub use crate::solvers::{bisection, brent, secant, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
