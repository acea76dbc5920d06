//! Spread curve bootstrapping over a parent curve.

use std::sync::Arc;

use tenor_core::Date;

use super::{bootstrap_sequential, BootstrapSettings, Bootstrapper, Layering};
use crate::error::CurveResult;
use crate::instruments::PriceableInstrument;
use crate::interpolator::{CurveView, ValueTransform};
use crate::term::TermFunction;

/// Solves continuously compounded zero spreads over a base curve.
///
/// Instruments are priced on the composite `DF(t) = base(t) * exp(-s(t) t)`
/// with the base curve as their discount curve. Spreads are solved as
/// plain values: the settings' transform and anchor are ignored.
#[derive(Clone, Copy)]
pub struct RateSpreadBootstrapper<'a> {
    base: &'a dyn CurveView,
}

impl<'a> RateSpreadBootstrapper<'a> {
    /// Bootstrapper over `base`.
    #[must_use]
    pub fn new(base: &'a dyn CurveView) -> Self {
        Self { base }
    }
}

impl Bootstrapper for RateSpreadBootstrapper<'_> {
    fn bootstrap(
        &self,
        instruments: &[Arc<dyn PriceableInstrument>],
        base_date: Date,
        settings: &BootstrapSettings,
    ) -> CurveResult<TermFunction> {
        let settings = settings
            .with_transform(ValueTransform::None)
            .with_anchor(None);
        bootstrap_sequential(instruments, base_date, &settings, Layering::Spread(self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveConfig;
    use crate::identifier::PricingStructureType;
    use crate::instruments::test_support::FlatCurve;
    use crate::instruments::{DefaultInstrumentFactory, InstrumentFactory};
    use crate::quotes::{QuoteUnits, QuotedAsset};
    use tenor_core::calendars::WeekendCalendar;

    #[test]
    fn test_constant_basis_gives_positive_spreads() {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        let parent = FlatCurve { base, rate: 0.04 };
        let instruments: Vec<Arc<dyn PriceableInstrument>> = ["AUD-BasisSwap-1Y", "AUD-BasisSwap-3Y"]
            .iter()
            .map(|id| {
                let asset = QuotedAsset::with_market_quote(*id, 0.001, QuoteUnits::DecimalSpread);
                DefaultInstrumentFactory
                    .create(&asset, base, &WeekendCalendar)
                    .unwrap()
            })
            .collect();
        let settings = BootstrapSettings::from_config(&CurveConfig::default_for(
            PricingStructureType::RateBasisCurve,
        ));
        let spreads = RateSpreadBootstrapper::new(&parent)
            .bootstrap(&instruments, base, &settings)
            .unwrap();
        assert_eq!(spreads.len(), 2);
        for value in spreads.values() {
            assert!(value > 0.0009 && value < 0.0011, "spread {value}");
        }
    }
}
