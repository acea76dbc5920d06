//! Bump-and-rebuild risk sets.
//!
//! A risk set holds one rebuilt curve per bumped instrument. Each entry
//! is built from a deep copy of the quoted assets with a single
//! `MarketQuote` moved by `bp / 10000`, so the source curve is never
//! touched and entries can be built independently. With the `parallel`
//! feature the copies are built on the rayon pool; output order always
//! follows instrument order.

use serde::{Deserialize, Serialize};
use tenor_core::calendars::Calendar;
use tracing::info;

use crate::curves::{CurveVariant, PricingStructure};
use crate::error::CurveResult;
use crate::identifier::CurveIdentifier;
use crate::quotes::{add_and_replace_quotation_by_measure_type, MeasureType, QuotedAsset};

/// Which instruments of a layered curve are bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PricingStructureRiskSetType {
    /// The parent curve's instruments.
    #[default]
    Parent,
    /// The curve's own instruments.
    Child,
    /// Parent instruments followed by the curve's own.
    All,
}

/// A rebuilt curve with one instrument bumped.
#[derive(Debug, Clone)]
pub struct PerturbedCurve {
    /// The rebuilt curve, tagged with [`unique_identifier`](Self::unique_identifier).
    pub curve: CurveVariant,
    /// Identifier of the bumped instrument.
    pub perturbed_asset: String,
    /// Id of the curve the set was generated from.
    pub base_curve: String,
    /// Bump size in basis points.
    pub perturbed_amount: f64,
    /// `{unique_id}.{instrument_id}`.
    pub unique_identifier: String,
}

impl PerturbedCurve {
    /// Tags rebuilt curves against the curve they came from.
    pub(crate) fn tag_all(
        base: &CurveIdentifier,
        bp: f64,
        bumped: Vec<(String, CurveVariant)>,
    ) -> Vec<Self> {
        let unique_id = base.unique_id();
        info!(curve = %base, bp, size = bumped.len(), "risk set generated");
        bumped
            .into_iter()
            .map(|(asset, mut curve)| {
                let unique_identifier = format!("{unique_id}.{asset}");
                let core = curve.core_mut();
                core.identifier = core.identifier.clone().with_unique_name(&unique_identifier);
                Self {
                    curve,
                    perturbed_asset: asset,
                    base_curve: base.id(),
                    perturbed_amount: bp,
                    unique_identifier,
                }
            })
            .collect()
    }
}

/// Rebuilds a curve once per asset with that asset's `MarketQuote` moved by
/// `bp` basis points. Returns `(asset id, curve)` in asset order.
pub(crate) fn bump_each<F>(
    assets: &[QuotedAsset],
    bp: f64,
    rebuild: F,
) -> CurveResult<Vec<(String, CurveVariant)>>
where
    F: Fn(Vec<QuotedAsset>) -> CurveResult<CurveVariant> + Sync + Send,
{
    let perturbation = bp / 10_000.0;
    let bump = |index: usize| -> CurveResult<(String, CurveVariant)> {
        let mut copy = assets.to_vec();
        add_and_replace_quotation_by_measure_type(
            &mut copy[index].quotes,
            MeasureType::MarketQuote.as_str(),
            perturbation,
        )?;
        let id = copy[index].id.clone();
        Ok((id, rebuild(copy)?))
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..assets.len()).into_par_iter().map(bump).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..assets.len()).map(bump).collect()
    }
}

/// Risk set for any curve.
///
/// `risk_type` selects parent or child instruments for basis curves and is
/// ignored for every other curve.
pub fn create_curve_risk_set(
    curve: &CurveVariant,
    bp: f64,
    risk_type: PricingStructureRiskSetType,
    calendar: &dyn Calendar,
) -> CurveResult<Vec<PerturbedCurve>> {
    match curve {
        CurveVariant::RateBasis(basis) => basis.create_curve_risk_set_for(bp, risk_type, calendar),
        other => other.create_curve_risk_set(bp, calendar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveConfig;
    use crate::curves::RateCurve;
    use crate::identifier::PricingStructureType;
    use crate::quotes::QuoteUnits;
    use tenor_core::calendars::WeekendCalendar;
    use tenor_core::Date;

    fn curve() -> CurveVariant {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        let identifier = CurveIdentifier::new(PricingStructureType::RateCurve, "Default", base, "AUD")
            .with_unique_name("AUD.Disc");
        let mut curve = RateCurve::new(
            identifier,
            CurveConfig::default_for(PricingStructureType::RateCurve),
            vec![
                QuotedAsset::with_market_quote("AUD-Deposit-1M", 5.30, QuoteUnits::Rate),
                QuotedAsset::with_market_quote("AUD-IRFuture-IR-H4", 9500.0, QuoteUnits::IRFuturesPrice),
                QuotedAsset::with_market_quote("AUD-IRSwap-2Y", 0.0495, QuoteUnits::DecimalRate),
            ],
        );
        curve.build(&WeekendCalendar).unwrap();
        CurveVariant::Rate(curve)
    }

    #[test]
    fn test_tags_and_order() {
        let curve = curve();
        let set = create_curve_risk_set(
            &curve,
            1.0,
            PricingStructureRiskSetType::Child,
            &WeekendCalendar,
        )
        .unwrap();
        assert_eq!(set.len(), 3);
        let assets: Vec<_> = set.iter().map(|p| p.perturbed_asset.as_str()).collect();
        assert_eq!(assets, ["AUD-Deposit-1M", "AUD-IRFuture-IR-H4", "AUD-IRSwap-2Y"]);
        assert_eq!(set[1].unique_identifier, "AUD.Disc.AUD-IRFuture-IR-H4");
        assert_eq!(set[1].curve.identifier().unique_id(), set[1].unique_identifier);
        assert_eq!(set[0].base_curve, curve.id());
        assert_eq!(set[0].perturbed_amount, 1.0);
    }

    #[test]
    fn test_bump_keeps_units() {
        let curve = curve();
        let set = curve.create_curve_risk_set(1.0, &WeekendCalendar).unwrap();

        let deposit = set[0].curve.quoted_assets()[0].market_quote().unwrap().value;
        assert!((deposit - 5.31).abs() < 1e-12);
        let future = set[1].curve.quoted_assets()[1].market_quote().unwrap().value;
        assert!((future - 9499.0).abs() < 1e-9);

        // source untouched
        assert_eq!(curve.quoted_assets()[1].market_quote().unwrap().value, 9500.0);
    }

    #[test]
    fn test_zero_bump_reproduces_curve() {
        let curve = curve();
        let set = curve.create_curve_risk_set(0.0, &WeekendCalendar).unwrap();
        for perturbed in &set {
            assert_eq!(perturbed.curve.term_function(), curve.term_function());
        }
    }
}
