//! Floating-for-floating basis swap.

use tenor_core::calendars::Calendar;
use tenor_core::types::Frequency;
use tenor_core::Date;

use super::swap::{asset_frequency, FixedLeg};
use super::{
    asset_day_count, InstrumentKind, InstrumentQuote, PriceableInstrument, PricingContext,
};
use crate::error::CurveResult;
use crate::quotes::QuotedAsset;

/// A basis swap quoted as the spread between two floating indices.
///
/// Each leg is represented by its par rate over a quarterly schedule; the
/// implied basis is the par rate on the curve being built less the par
/// rate on the discount (parent) curve.
#[derive(Debug, Clone)]
pub struct BasisSwap {
    quote: InstrumentQuote,
    leg: FixedLeg,
}

impl BasisSwap {
    /// Creates a basis swap from `start` to `end`.
    pub fn new(
        asset: QuotedAsset,
        start: Date,
        end: Date,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let frequency = asset_frequency(&asset, Frequency::Quarterly)?;
        let day_count = asset_day_count(&asset)?;
        let leg = FixedLeg::new(start, end, frequency, day_count, calendar)?;
        Ok(Self {
            quote: InstrumentQuote::new(asset)?,
            leg,
        })
    }
}

impl PriceableInstrument for BasisSwap {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::BasisSwap
    }

    fn risk_maturity_date(&self) -> Date {
        self.leg.payments[self.leg.payments.len() - 1]
    }

    fn quoted_asset(&self) -> &QuotedAsset {
        &self.quote.asset
    }

    fn market_quote(&self) -> f64 {
        self.quote.value
    }

    fn implied_quote(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        let discount = ctx.discount_curve(self.id())?;
        Ok(self.leg.par_rate(ctx.curve)? - self.leg.par_rate(discount)?)
    }
}
