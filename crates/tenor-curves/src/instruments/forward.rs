//! Equity and FX forwards.

use tenor_core::Date;

use super::{InstrumentKind, InstrumentQuote, PriceableInstrument, PricingContext};
use crate::error::{CurveError, CurveResult};
use crate::quotes::QuotedAsset;

/// A forward quoted on its level, for equity and FX forward curves.
///
/// The curve value at maturity is the forward itself, so the quote is also
/// the closed form.
#[derive(Debug, Clone)]
pub struct ForwardContract {
    quote: InstrumentQuote,
    kind: InstrumentKind,
    maturity: Date,
}

impl ForwardContract {
    /// Creates an equity or FX forward maturing on `maturity`.
    pub fn new(asset: QuotedAsset, kind: InstrumentKind, maturity: Date) -> CurveResult<Self> {
        if !matches!(kind, InstrumentKind::EquityForward | InstrumentKind::FxForward) {
            return Err(CurveError::validation(format!(
                "{kind} is not a forward contract"
            )));
        }
        let quote = InstrumentQuote::new(asset)?;
        if quote.value <= 0.0 {
            return Err(CurveError::quote(format!(
                "{}: forward level must be positive, got {}",
                quote.asset.id, quote.value
            )));
        }
        Ok(Self {
            quote,
            kind,
            maturity,
        })
    }
}

impl PriceableInstrument for ForwardContract {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        self.kind
    }

    fn risk_maturity_date(&self) -> Date {
        self.maturity
    }

    fn quoted_asset(&self) -> &QuotedAsset {
        &self.quote.asset
    }

    fn market_quote(&self) -> f64 {
        self.quote.value
    }

    fn implied_quote(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        ctx.curve.value_at(self.maturity)
    }

    fn closed_form_value(&self, _ctx: &PricingContext<'_>) -> CurveResult<Option<f64>> {
        Ok(Some(self.quote.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::QuoteUnits;

    #[test]
    fn test_forward_levels() {
        let maturity = Date::from_ymd(2024, 7, 2).unwrap();
        let asset = QuotedAsset::with_market_quote("BHP-EquityForward-6M", 45.2, QuoteUnits::ForwardValue);
        let forward = ForwardContract::new(asset, InstrumentKind::EquityForward, maturity).unwrap();
        assert_eq!(forward.market_quote(), 45.2);
        assert_eq!(forward.kind(), InstrumentKind::EquityForward);

        let asset = QuotedAsset::with_market_quote("AUDUSD-FxForward-3M", 0.66, QuoteUnits::FxRate);
        assert!(ForwardContract::new(asset.clone(), InstrumentKind::Deposit, maturity).is_err());
        assert!(ForwardContract::new(asset, InstrumentKind::FxForward, maturity).is_ok());

        let negative = QuotedAsset::with_market_quote("BHP-EquityForward-1Y", -1.0, QuoteUnits::ForwardValue);
        assert!(ForwardContract::new(negative, InstrumentKind::EquityForward, maturity).is_err());
    }
}
