//! Survival curve bootstrapping.

use std::sync::Arc;

use tenor_core::Date;

use super::{bootstrap_sequential, BootstrapSettings, Bootstrapper, Layering};
use crate::error::CurveResult;
use crate::instruments::PriceableInstrument;
use crate::interpolator::CurveView;
use crate::term::TermFunction;

/// Solves survival probabilities (or hazard rates) from CDS par spreads,
/// discounting on a separate rate curve.
#[derive(Clone, Copy)]
pub struct CreditBootstrapper<'a> {
    discount: &'a dyn CurveView,
}

impl<'a> CreditBootstrapper<'a> {
    /// Bootstrapper discounting on `discount`.
    #[must_use]
    pub fn new(discount: &'a dyn CurveView) -> Self {
        Self { discount }
    }
}

impl Bootstrapper for CreditBootstrapper<'_> {
    fn bootstrap(
        &self,
        instruments: &[Arc<dyn PriceableInstrument>],
        base_date: Date,
        settings: &BootstrapSettings,
    ) -> CurveResult<TermFunction> {
        bootstrap_sequential(
            instruments,
            base_date,
            settings,
            Layering::Discounted(self.discount),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CurveConfig, UnderlyingCurve};
    use crate::identifier::PricingStructureType;
    use crate::instruments::test_support::FlatCurve;
    use crate::instruments::{DefaultInstrumentFactory, InstrumentFactory};
    use crate::quotes::{QuoteUnits, QuotedAsset};
    use tenor_core::calendars::WeekendCalendar;

    fn cds(base: Date) -> Vec<Arc<dyn PriceableInstrument>> {
        [("AUD-CDS-1Y", 0.006), ("AUD-CDS-3Y", 0.009), ("AUD-CDS-5Y", 0.012)]
            .iter()
            .map(|(id, spread)| {
                let asset = QuotedAsset::with_market_quote(*id, *spread, QuoteUnits::DecimalRate);
                DefaultInstrumentFactory
                    .create(&asset, base, &WeekendCalendar)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_hazard_curve() {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        let discount = FlatCurve { base, rate: 0.04 };
        let settings = BootstrapSettings::from_config(&CurveConfig::default_for(
            PricingStructureType::CreditCurve,
        ));
        let hazards = CreditBootstrapper::new(&discount)
            .bootstrap(&cds(base), base, &settings)
            .unwrap();
        // upward sloping spreads give increasing average hazard
        let values = hazards.values();
        assert!(values.windows(2).all(|w| w[1] > w[0]), "{values:?}");
        assert!((values[0] - 0.006 / 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_survival_probabilities() {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        let discount = FlatCurve { base, rate: 0.04 };
        let config = CurveConfig::default_for(PricingStructureType::CreditCurve)
            .with_underlying_curve(UnderlyingCurve::SurvivalCurve);
        let settings = BootstrapSettings::from_config(&config);
        let probabilities = CreditBootstrapper::new(&discount)
            .bootstrap(&cds(base), base, &settings)
            .unwrap();
        let values = probabilities.values();
        assert!(values.windows(2).all(|w| w[1] < w[0]), "{values:?}");
        assert!(values.iter().all(|q| *q > 0.0 && *q < 1.0));
    }
}
