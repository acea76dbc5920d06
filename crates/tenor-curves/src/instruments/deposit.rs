//! Money market deposit.

use tenor_core::daycounts::{DayCount, DayCountConvention};
use tenor_core::Date;

use super::{
    asset_day_count, simple_forward_rate, InstrumentKind, InstrumentQuote, PriceableInstrument,
    PricingContext,
};
use crate::error::CurveResult;
use crate::quotes::QuotedAsset;

/// A deposit from `start` to `end` at a simple rate.
///
/// Reprices when
/// ```text
/// DF(end) = DF(start) / (1 + r × τ)
/// ```
/// which is also its closed form.
#[derive(Debug, Clone)]
pub struct Deposit {
    quote: InstrumentQuote,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit; the asset must carry a `MarketQuote`.
    pub fn new(asset: QuotedAsset, start: Date, end: Date) -> CurveResult<Self> {
        let day_count = asset_day_count(&asset)?;
        Ok(Self {
            quote: InstrumentQuote::new(asset)?,
            start,
            end,
            day_count,
        })
    }

    /// Start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start
    }

    /// Accrual fraction.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction_f64(self.start, self.end)
    }
}

impl PriceableInstrument for Deposit {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Deposit
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
        simple_forward_rate(ctx.curve, self.start, self.end, self.year_fraction())
    }

    fn closed_form_value(&self, ctx: &PricingContext<'_>) -> CurveResult<Option<f64>> {
        let df_start = ctx.curve.value_at(self.start)?;
        Ok(Some(df_start / (1.0 + self.quote.value * self.year_fraction())))
    }
}
