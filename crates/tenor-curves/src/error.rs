//! Error types for curve construction and queries.
//!
//! Five classes of failure surface to callers: configuration, quotes,
//! convergence, domain and validation. Numerical and date errors from the
//! lower crates are wrapped unchanged.

use tenor_core::CoreError;
use tenor_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A required algorithm property is missing or unparseable.
    #[error("Configuration error for '{key}': {reason}")]
    Configuration {
        /// The property name.
        key: String,
        /// What went wrong.
        reason: String,
    },

    /// A quote could not be interpreted.
    #[error("Quote error: {reason}")]
    Quote {
        /// What went wrong.
        reason: String,
    },

    /// Two quotations share a measure type.
    #[error("Duplicate measure type '{measure_type}' in quotation set")]
    DuplicateMeasureType {
        /// The duplicated measure type.
        measure_type: String,
    },

    /// A quote unit string is not recognized.
    #[error("Unrecognized quote units '{units}'")]
    UnrecognizedUnits {
        /// The offending string.
        units: String,
    },

    /// An instrument carries no market quote.
    #[error("No {measure_type} quote for {asset}")]
    MissingQuote {
        /// Asset identifier.
        asset: String,
        /// The measure type looked for.
        measure_type: String,
    },

    /// A pillar could not be solved within tolerance.
    #[error(
        "Bootstrap of {instrument} failed after {iterations} iterations (residual: {residual:.2e})"
    )]
    Convergence {
        /// Instrument identifier.
        instrument: String,
        /// Iterations used.
        iterations: u32,
        /// Remaining quote error.
        residual: f64,
    },

    /// Query outside the curve domain with extrapolation disabled.
    #[error("Time {requested:.6} outside curve domain [{min:.6}, {max:.6}]")]
    Domain {
        /// Requested time in years.
        requested: f64,
        /// First time with data.
        min: f64,
        /// Last time with data.
        max: f64,
    },

    /// Inputs violate a precondition.
    #[error("Validation error: {reason}")]
    Validation {
        /// What went wrong.
        reason: String,
    },

    /// A named curve is absent.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// Name of the missing curve.
        name: String,
    },

    /// The curve has not been built.
    #[error("Curve {id} has not been built")]
    NotBuilt {
        /// Curve identifier.
        id: String,
    },

    /// Numerical failure.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Date or convention failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Broad error class, one per failure taxonomy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed algorithm configuration.
    Configuration,
    /// Bad or missing quotes.
    Quote,
    /// Solver did not reach tolerance.
    Convergence,
    /// Query outside the curve domain.
    Domain,
    /// Precondition or lookup failure.
    Validation,
}

impl CurveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a quote error.
    #[must_use]
    pub fn quote(reason: impl Into<String>) -> Self {
        Self::Quote {
            reason: reason.into(),
        }
    }

    /// Creates a duplicate measure type error.
    #[must_use]
    pub fn duplicate_measure_type(measure_type: impl Into<String>) -> Self {
        Self::DuplicateMeasureType {
            measure_type: measure_type.into(),
        }
    }

    /// Creates an unrecognized units error.
    #[must_use]
    pub fn unrecognized_units(units: impl Into<String>) -> Self {
        Self::UnrecognizedUnits {
            units: units.into(),
        }
    }

    /// Creates a missing quote error.
    #[must_use]
    pub fn missing_quote(asset: impl Into<String>, measure_type: impl Into<String>) -> Self {
        Self::MissingQuote {
            asset: asset.into(),
            measure_type: measure_type.into(),
        }
    }

    /// Creates a convergence error.
    #[must_use]
    pub fn convergence(instrument: impl Into<String>, iterations: u32, residual: f64) -> Self {
        Self::Convergence {
            instrument: instrument.into(),
            iterations,
            residual,
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(requested: f64, min: f64, max: f64) -> Self {
        Self::Domain {
            requested,
            min,
            max,
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(name: impl Into<String>) -> Self {
        Self::CurveNotFound { name: name.into() }
    }

    /// Creates a not built error.
    #[must_use]
    pub fn not_built(id: impl Into<String>) -> Self {
        Self::NotBuilt { id: id.into() }
    }

    /// The taxonomy class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Quote { .. }
            | Self::DuplicateMeasureType { .. }
            | Self::UnrecognizedUnits { .. }
            | Self::MissingQuote { .. } => ErrorKind::Quote,
            Self::Convergence { .. } => ErrorKind::Convergence,
            Self::Domain { .. } => ErrorKind::Domain,
            Self::Validation { .. } | Self::CurveNotFound { .. } | Self::NotBuilt { .. } => {
                ErrorKind::Validation
            }
            Self::Math(e) => match e {
                MathError::ConvergenceFailed { .. } | MathError::InvalidBracket { .. } => {
                    ErrorKind::Convergence
                }
                MathError::ExtrapolationNotAllowed { .. } => ErrorKind::Domain,
                MathError::InsufficientData { .. }
                | MathError::SingularMatrix
                | MathError::InvalidInput { .. } => ErrorKind::Validation,
            },
            Self::Core(_) => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::convergence("AUD-IRSwap-5Y", 100, 1e-6);
        let msg = err.to_string();
        assert!(msg.contains("AUD-IRSwap-5Y"));
        assert!(msg.contains("100 iterations"));

        let err = CurveError::configuration("DayCounter", "missing");
        assert!(err.to_string().contains("DayCounter"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            CurveError::duplicate_measure_type("MarketQuote").kind(),
            ErrorKind::Quote
        );
        assert_eq!(CurveError::curve_not_found("AUD").kind(), ErrorKind::Validation);
        assert_eq!(CurveError::not_built("AUD").kind(), ErrorKind::Validation);
        assert_eq!(CurveError::domain(5.0, 0.0, 1.0).kind(), ErrorKind::Domain);
        assert_eq!(
            CurveError::from(MathError::convergence_failed(10, 1.0)).kind(),
            ErrorKind::Convergence
        );
    }
}
