//! Curve identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tenor_core::{Date, Period};

use crate::error::CurveError;

/// The kind of pricing structure a curve is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PricingStructureType {
    /// Discount curve bootstrapped from rate instruments.
    RateCurve,
    /// Spread curve layered on a parent rate curve.
    RateBasisCurve,
    /// Survival probability curve bootstrapped from CDS spreads.
    CreditCurve,
    /// Equity forward curve.
    EquityCurve,
    /// FX forward curve.
    FxCurve,
}

impl PricingStructureType {
    /// All curve types.
    pub const ALL: [PricingStructureType; 5] = [
        PricingStructureType::RateCurve,
        PricingStructureType::RateBasisCurve,
        PricingStructureType::CreditCurve,
        PricingStructureType::EquityCurve,
        PricingStructureType::FxCurve,
    ];

    /// Name used in identifiers and algorithm stores.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateCurve => "RateCurve",
            Self::RateBasisCurve => "RateBasisCurve",
            Self::CreditCurve => "CreditCurve",
            Self::EquityCurve => "EquityCurve",
            Self::FxCurve => "FxCurve",
        }
    }
}

impl fmt::Display for PricingStructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingStructureType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CurveError::validation(format!("unknown pricing structure type '{s}'")))
    }
}

/// Immutable identity of a curve.
///
/// ```rust
/// use tenor_core::{Date, Period};
/// use tenor_curves::identifier::{CurveIdentifier, PricingStructureType};
///
/// let id = CurveIdentifier::new(
///     PricingStructureType::RateCurve,
///     "Default",
///     Date::from_ymd(2024, 1, 2).unwrap(),
///     "AUD",
/// )
/// .with_index("BBR-BBSW", Period::months(3));
/// assert_eq!(id.id(), "RateCurve.AUD-BBR-BBSW-3M.2024-01-02");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveIdentifier {
    /// Kind of curve.
    pub pricing_structure_type: PricingStructureType,
    /// Algorithm name resolved against the algorithm store.
    pub algorithm: String,
    /// Valuation date.
    pub base_date: Date,
    /// Currency, or the underlying name for equity curves.
    pub currency: String,
    /// Index or reference entity name.
    #[serde(default)]
    pub index_name: Option<String>,
    /// Index tenor.
    #[serde(default)]
    pub index_tenor: Option<Period>,
    /// Caller-assigned unique name.
    #[serde(default)]
    pub unique_name: Option<String>,
}

impl CurveIdentifier {
    /// Creates an identifier with no index or unique name.
    #[must_use]
    pub fn new(
        pricing_structure_type: PricingStructureType,
        algorithm: impl Into<String>,
        base_date: Date,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            pricing_structure_type,
            algorithm: algorithm.into(),
            base_date,
            currency: currency.into(),
            index_name: None,
            index_tenor: None,
            unique_name: None,
        }
    }

    /// Sets the index name and tenor.
    #[must_use]
    pub fn with_index(mut self, name: impl Into<String>, tenor: Period) -> Self {
        self.index_name = Some(name.into());
        self.index_tenor = Some(tenor);
        self
    }

    /// Sets the index or reference entity name without a tenor.
    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Sets the unique name.
    #[must_use]
    pub fn with_unique_name(mut self, name: impl Into<String>) -> Self {
        self.unique_name = Some(name.into());
        self
    }

    /// Market name: currency, index and tenor joined by dashes.
    #[must_use]
    pub fn name(&self) -> String {
        let mut parts = vec![self.currency.clone()];
        if let Some(index) = &self.index_name {
            parts.push(index.clone());
        }
        if let Some(tenor) = &self.index_tenor {
            parts.push(tenor.to_string());
        }
        parts.join("-")
    }

    /// Stable identifier, e.g. `RateCurve.AUD-BBR-BBSW-3M.2024-01-02`.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}",
            self.pricing_structure_type,
            self.name(),
            self.base_date
        )
    }

    /// The unique name if set, otherwise [`id`](Self::id).
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.unique_name.clone().unwrap_or_else(|| self.id())
    }

    /// Copy tagged as a clone of this curve.
    #[must_use]
    pub fn cloned_identity(&self) -> Self {
        let unique = format!("{}.Clone", self.unique_id());
        self.clone().with_unique_name(unique)
    }
}

impl fmt::Display for CurveIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unique_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    #[test]
    fn test_ids() {
        let id = CurveIdentifier::new(PricingStructureType::RateCurve, "Default", base(), "AUD")
            .with_index("BBR-BBSW", Period::months(3));
        assert_eq!(id.name(), "AUD-BBR-BBSW-3M");
        assert_eq!(id.id(), "RateCurve.AUD-BBR-BBSW-3M.2024-01-02");
        assert_eq!(id.unique_id(), id.id());

        let named = id.clone().with_unique_name("AUD-Disc");
        assert_eq!(named.unique_id(), "AUD-Disc");
        assert_eq!(named.cloned_identity().unique_id(), "AUD-Disc.Clone");
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!(
            "ratebasiscurve".parse::<PricingStructureType>().unwrap(),
            PricingStructureType::RateBasisCurve
        );
        assert!("Surface".parse::<PricingStructureType>().is_err());
    }

    #[test]
    fn test_serde() {
        let id = CurveIdentifier::new(PricingStructureType::EquityCurve, "Default", base(), "AUD")
            .with_index_name("BHP");
        let json = serde_json::to_string(&id).unwrap();
        let back: CurveIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.id(), "EquityCurve.AUD-BHP.2024-01-02");
    }
}
