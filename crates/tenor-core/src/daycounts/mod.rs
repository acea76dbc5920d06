//! Day count conventions.
//!
//! A day count turns a pair of dates into a year fraction. Curves use it to
//! map pillar dates onto the time axis the interpolators work on, and the
//! instruments use it for accrual.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: money-market basis
//! - [`Act365Fixed`]: AUD/GBP money markets and the default curve time axis
//! - [`ActActIsda`]: year-split actual/actual
//! - [`Thirty360`]: 30/360 bond basis
//!
//! ```rust
//! use tenor_core::daycounts::{DayCount, DayCountConvention};
//! use tenor_core::types::Date;
//!
//! let dc = DayCountConvention::Act365Fixed;
//! let start = Date::from_ymd(2024, 1, 2).unwrap();
//! let end = Date::from_ymd(2025, 1, 1).unwrap();
//! assert_eq!(dc.year_fraction_f64(start, end), 1.0);
//! ```

mod act;
mod actact;
mod thirty360;

pub use act::{Act360, Act365Fixed};
pub use actact::ActActIsda;
pub use thirty360::Thirty360;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// A day count convention.
pub trait DayCount: Send + Sync {
    /// Market name of the convention.
    fn name(&self) -> &'static str;

    /// Exact year fraction between two dates; negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Number of days between the dates under this convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as `f64`, for the numerical layers.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(0.0)
    }
}

/// Runtime-selectable day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    #[default]
    Act365Fixed,
    /// Actual/Actual ISDA
    ActActIsda,
    /// 30/360 bond basis
    Thirty360,
}

impl DayCountConvention {
    /// All supported conventions.
    pub const ALL: [DayCountConvention; 4] = [
        DayCountConvention::Act360,
        DayCountConvention::Act365Fixed,
        DayCountConvention::ActActIsda,
        DayCountConvention::Thirty360,
    ];

    /// Days in the nominal year of the convention.
    ///
    /// Used to rescale a raw day count into the convention's year, as the
    /// zero-rate transforms do.
    #[must_use]
    pub const fn basis(&self) -> u32 {
        match self {
            DayCountConvention::Act360 | DayCountConvention::Thirty360 => 360,
            DayCountConvention::Act365Fixed | DayCountConvention::ActActIsda => 365,
        }
    }

    fn implementation(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::Act360 => &Act360,
            DayCountConvention::Act365Fixed => &Act365Fixed,
            DayCountConvention::ActActIsda => &ActActIsda,
            DayCountConvention::Thirty360 => &Thirty360,
        }
    }
}

impl DayCount for DayCountConvention {
    fn name(&self) -> &'static str {
        self.implementation().name()
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        self.implementation().year_fraction(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        self.implementation().day_count(start, end)
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Accepts the common market spellings, including the FpML-style
    /// `ACT/365.FIXED` and `30/360`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365.FIXED" | "ACT/365 FIXED" | "ACTUAL/365"
            | "ACT365FIXED" => Ok(DayCountConvention::Act365Fixed),
            "ACT/ACT" | "ACT/ACT.ISDA" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTACTISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "30/360" | "30/360 US" | "BOND" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(CoreError::unknown_convention("day count", s)),
        }
    }
}
