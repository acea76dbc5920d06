//! Market tenor periods such as `ON`, `1W`, `3M` and `10Y`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days
    Days,
    /// Weeks of seven days
    Weeks,
    /// Calendar months
    Months,
    /// Calendar years
    Years,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

/// A market tenor: a signed count of [`TimeUnit`]s.
///
/// The overnight shorthands map to day counts from the base date:
/// `ON` is one day, `TN` two and `SN` three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    length: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Shorthand for a number of months.
    #[must_use]
    pub const fn months(length: i32) -> Self {
        Self::new(length, TimeUnit::Months)
    }

    /// Shorthand for a number of years.
    #[must_use]
    pub const fn years(length: i32) -> Self {
        Self::new(length, TimeUnit::Years)
    }

    /// Number of units.
    #[must_use]
    pub const fn length(&self) -> i32 {
        self.length
    }

    /// The unit.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Approximate length in years, used for ordering and grid sizing only.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.length);
        match self.unit {
            TimeUnit::Days => n / 365.0,
            TimeUnit::Weeks => n * 7.0 / 365.0,
            TimeUnit::Months => n / 12.0,
            TimeUnit::Years => n,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_uppercase();
        match text.as_str() {
            "ON" | "O/N" => return Ok(Period::new(1, TimeUnit::Days)),
            "TN" | "T/N" => return Ok(Period::new(2, TimeUnit::Days)),
            "SN" | "S/N" => return Ok(Period::new(3, TimeUnit::Days)),
            "" => return Err(CoreError::invalid_period(s, "empty tenor")),
            _ => {}
        }

        let (number, unit) = text.split_at(text.len() - 1);
        let unit = match unit {
            "D" => TimeUnit::Days,
            "W" => TimeUnit::Weeks,
            "M" => TimeUnit::Months,
            "Y" => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_period(
                    s,
                    format!("unknown unit '{other}'"),
                ))
            }
        };
        let length = number
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_period(s, "length is not an integer"))?;
        Ok(Period::new(length, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_tenors() {
        assert_eq!("3M".parse::<Period>().unwrap(), Period::months(3));
        assert_eq!("10y".parse::<Period>().unwrap(), Period::years(10));
        assert_eq!(
            "2W".parse::<Period>().unwrap(),
            Period::new(2, TimeUnit::Weeks)
        );
    }

    #[test]
    fn test_parse_overnight_shorthands() {
        assert_eq!("ON".parse::<Period>().unwrap(), Period::new(1, TimeUnit::Days));
        assert_eq!("TN".parse::<Period>().unwrap(), Period::new(2, TimeUnit::Days));
        assert_eq!("SN".parse::<Period>().unwrap(), Period::new(3, TimeUnit::Days));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Period>().is_err());
        assert!("3Q".parse::<Period>().is_err());
        assert!("XM".parse::<Period>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let p = Period::months(18);
        assert_eq!(p.to_string(), "18M");
        assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
    }
}
