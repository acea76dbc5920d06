//! Error types for the core date and convention types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing dates, periods or conventions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid or out-of-range calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string that could not be parsed.
    #[error("Invalid period '{value}': {reason}")]
    InvalidPeriod {
        /// The offending text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A convention name that is not recognised.
    #[error("Unknown {kind}: '{value}'")]
    UnknownConvention {
        /// Which convention family was being parsed.
        kind: &'static str,
        /// The offending text.
        value: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown convention error.
    #[must_use]
    pub fn unknown_convention(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownConvention {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30");
        assert_eq!(err.to_string(), "Invalid date: 2024-02-30");

        let err = CoreError::unknown_convention("day count", "ACT/999");
        assert!(err.to_string().contains("day count"));
        assert!(err.to_string().contains("ACT/999"));
    }
}
