//! Forward rate agreement.

use tenor_core::daycounts::{DayCount, DayCountConvention};
use tenor_core::Date;

use super::{
    asset_day_count, simple_forward_rate, InstrumentKind, InstrumentQuote, PriceableInstrument,
    PricingContext,
};
use crate::error::CurveResult;
use crate::quotes::QuotedAsset;

/// A FRA fixing at `start` and paying at `end`.
///
/// The implied quote is the simple forward rate
/// `(DF(start) / DF(end) - 1) / τ`.
#[derive(Debug, Clone)]
pub struct Fra {
    quote: InstrumentQuote,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
}

impl Fra {
    /// Creates a FRA; the asset must carry a `MarketQuote`.
    pub fn new(asset: QuotedAsset, start: Date, end: Date) -> CurveResult<Self> {
        let day_count = asset_day_count(&asset)?;
        Ok(Self {
            quote: InstrumentQuote::new(asset)?,
            start,
            end,
            day_count,
        })
    }

    /// Fixing date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start
    }
}

impl PriceableInstrument for Fra {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Fra
    }

    fn risk_maturity_date(&self) -> Date {
        self.end
    }

    fn quoted_asset(&self) -> &QuotedAsset {
        &self.quote.asset
    }

    fn market_quote(&self) -> f64 {
        self.quote.value
    }

    fn implied_quote(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        let tau = self.day_count.year_fraction_f64(self.start, self.end);
        simple_forward_rate(ctx.curve, self.start, self.end, tau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::test_support::FlatCurve;
    use crate::quotes::QuoteUnits;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_rate() {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        let start = Date::from_ymd(2024, 4, 2).unwrap();
        let end = Date::from_ymd(2024, 7, 2).unwrap();
        let asset = QuotedAsset::with_market_quote("AUD-Fra-3M-6M", 4.5, QuoteUnits::Rate);
        let fra = Fra::new(asset, start, end).unwrap();
        assert_eq!(fra.risk_maturity_date(), end);
        assert_eq!(fra.kind(), InstrumentKind::Fra);

        let curve = FlatCurve { base, rate: 0.04 };
        let tau = 91.0 / 365.0;
        let expected = ((0.04_f64 * tau).exp() - 1.0) / tau;
        let implied = fra.implied_quote(&PricingContext::new(&curve)).unwrap();
        assert_relative_eq!(implied, expected, epsilon = 1e-12);
        assert!(fra.closed_form_value(&PricingContext::new(&curve)).unwrap().is_none());
    }
}
