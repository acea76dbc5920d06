//! Payment frequency and rate compounding conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Payment frequency of a fixed leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// One payment per year
    #[default]
    Annual,
    /// Two payments per year
    SemiAnnual,
    /// Four payments per year
    Quarterly,
    /// Twelve payments per year
    Monthly,
}

impl Frequency {
    /// Number of months in one period.
    #[must_use]
    pub fn months_per_period(&self) -> i32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
        }
    }

    /// Number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        (12 / self.months_per_period()) as u32
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "SemiAnnual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

/// Compounding convention used to express a zero rate.
///
/// Curves store continuously compounded zero rates unless configured
/// otherwise; the conversions here are the only place the convention
/// touches the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest
    Simple,
    /// Annual compounding
    Annual,
    /// Semi-annual compounding
    SemiAnnual,
    /// Quarterly compounding
    Quarterly,
    /// Monthly compounding
    Monthly,
    /// Daily compounding (365 periods)
    Daily,
    /// Continuous compounding
    #[default]
    Continuous,
}

impl Compounding {
    /// Compounding periods per year, `None` for simple and continuous.
    #[must_use]
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Compounding::Simple | Compounding::Continuous => None,
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
            Compounding::Daily => Some(365),
        }
    }

    /// Discount factor implied by a zero rate over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        if t == 0.0 {
            return 1.0;
        }
        match self {
            Compounding::Continuous => (-rate * t).exp(),
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            _ => {
                let n = f64::from(self.periods_per_year().unwrap_or(1));
                (1.0 + rate / n).powf(-n * t)
            }
        }
    }

    /// Zero rate implied by a discount factor over `t` years.
    ///
    /// At `t == 0` the rate is undefined and `0.0` is returned.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 || df <= 0.0 {
            return 0.0;
        }
        match self {
            Compounding::Continuous => -df.ln() / t,
            Compounding::Simple => (1.0 / df - 1.0) / t,
            _ => {
                let n = f64::from(self.periods_per_year().unwrap_or(1));
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "SemiAnnual",
            Compounding::Quarterly => "Quarterly",
            Compounding::Monthly => "Monthly",
            Compounding::Daily => "Daily",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Compounding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' ', '_'], "").as_str() {
            "SIMPLE" => Ok(Compounding::Simple),
            "ANNUAL" | "1Y" => Ok(Compounding::Annual),
            "SEMIANNUAL" | "6M" => Ok(Compounding::SemiAnnual),
            "QUARTERLY" | "3M" => Ok(Compounding::Quarterly),
            "MONTHLY" | "1M" => Ok(Compounding::Monthly),
            "DAILY" | "1D" => Ok(Compounding::Daily),
            "CONTINUOUS" => Ok(Compounding::Continuous),
            _ => Err(CoreError::unknown_convention("compounding frequency", s)),
        }
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' ', '_'], "").as_str() {
            "ANNUAL" | "1Y" | "12M" => Ok(Frequency::Annual),
            "SEMIANNUAL" | "6M" => Ok(Frequency::SemiAnnual),
            "QUARTERLY" | "3M" => Ok(Frequency::Quarterly),
            "MONTHLY" | "1M" => Ok(Frequency::Monthly),
            _ => Err(CoreError::unknown_convention("frequency", s)),
        }
    }
}
