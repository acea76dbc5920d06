//! Fixed-for-floating interest rate swap.

use tenor_core::calendars::Calendar;
use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::Frequency;
use tenor_core::Date;

use super::{
    accruals, asset_day_count, roll_schedule, InstrumentKind, InstrumentQuote,
    PriceableInstrument, PricingContext, FREQUENCY_PROPERTY,
};
use crate::error::{CurveError, CurveResult};
use crate::interpolator::CurveView;
use crate::quotes::QuotedAsset;

/// Fixed leg payment dates with their accrual fractions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FixedLeg {
    pub(crate) start: Date,
    pub(crate) payments: Vec<Date>,
    pub(crate) accruals: Vec<f64>,
}

impl FixedLeg {
    pub(crate) fn new(
        start: Date,
        end: Date,
        frequency: Frequency,
        day_count: DayCountConvention,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let payments = roll_schedule(start, end, frequency.months_per_period(), calendar)?;
        let accruals = accruals(start, &payments, &day_count);
        Ok(Self {
            start,
            payments,
            accruals,
        })
    }

    /// Par rate on a single curve: `(DF(start) - DF(end)) / Σ τ DF`.
    pub(crate) fn par_rate(&self, curve: &dyn CurveView) -> CurveResult<f64> {
        let mut annuity = 0.0;
        for (date, tau) in self.payments.iter().zip(&self.accruals) {
            annuity += tau * curve.value_at(*date)?;
        }
        if annuity <= 0.0 {
            return Err(CurveError::validation("swap annuity is not positive"));
        }
        let end = self.payments[self.payments.len() - 1];
        Ok((curve.value_at(self.start)? - curve.value_at(end)?) / annuity)
    }
}

/// Fixed leg frequency from the asset's `FixedFrequency` property.
pub(crate) fn asset_frequency(asset: &QuotedAsset, default: Frequency) -> CurveResult<Frequency> {
    match asset.property(FREQUENCY_PROPERTY) {
        Some(text) => Ok(text.parse()?),
        None => Ok(default),
    }
}

/// A vanilla swap quoted on its par fixed rate.
///
/// The fixed leg pays semi-annually unless the asset's `FixedFrequency`
/// property says otherwise; the floating leg is assumed to price at par
/// on the same curve.
#[derive(Debug, Clone)]
pub struct InterestRateSwap {
    quote: InstrumentQuote,
    leg: FixedLeg,
}

impl InterestRateSwap {
    /// Creates a swap from `start` to `end`.
    pub fn new(
        asset: QuotedAsset,
        start: Date,
        end: Date,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let frequency = asset_frequency(&asset, Frequency::SemiAnnual)?;
        let day_count = asset_day_count(&asset)?;
        let leg = FixedLeg::new(start, end, frequency, day_count, calendar)?;
        Ok(Self {
            quote: InstrumentQuote::new(asset)?,
            leg,
        })
    }

    /// Fixed leg payment dates.
    #[must_use]
    pub fn payment_dates(&self) -> &[Date] {
        &self.leg.payments
    }
}

impl PriceableInstrument for InterestRateSwap {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::IrSwap
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
        self.leg.par_rate(ctx.curve)
    }
}
