//! Credit default swap.

use tenor_core::calendars::Calendar;
use tenor_core::types::Frequency;
use tenor_core::Date;

use super::swap::{asset_frequency, FixedLeg};
use super::{
    asset_day_count, InstrumentKind, InstrumentQuote, PriceableInstrument, PricingContext,
    RECOVERY_PROPERTY,
};
use crate::error::{CurveError, CurveResult};
use crate::quotes::QuotedAsset;

/// Recovery assumed when the asset does not say.
pub const DEFAULT_RECOVERY_RATE: f64 = 0.4;

/// A CDS quoted on its par spread.
///
/// `curve` in the pricing context gives survival probabilities and
/// `discount` the risk-free discount factors. Premiums are paid quarterly
/// with half an accrual period paid on default:
///
/// ```text
/// RPV01      = Σ τᵢ DFᵢ (Qᵢ + Qᵢ₋₁) / 2
/// protection = (1 - R) Σ DFᵢ (Qᵢ₋₁ - Qᵢ)
/// spread     = protection / RPV01
/// ```
#[derive(Debug, Clone)]
pub struct CreditDefaultSwap {
    quote: InstrumentQuote,
    leg: FixedLeg,
    recovery_rate: f64,
}

impl CreditDefaultSwap {
    /// Creates a CDS from `start` to `end`.
    pub fn new(
        asset: QuotedAsset,
        start: Date,
        end: Date,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let frequency = asset_frequency(&asset, Frequency::Quarterly)?;
        let day_count = asset_day_count(&asset)?;
        let recovery_rate = match asset.property(RECOVERY_PROPERTY) {
            Some(text) => text.trim().parse::<f64>().map_err(|_| {
                CurveError::validation(format!("{}: bad recovery rate '{text}'", asset.id))
            })?,
            None => DEFAULT_RECOVERY_RATE,
        };
        if !(0.0..1.0).contains(&recovery_rate) {
            return Err(CurveError::validation(format!(
                "{}: recovery rate {recovery_rate} outside [0, 1)",
                asset.id
            )));
        }
        let leg = FixedLeg::new(start, end, frequency, day_count, calendar)?;
        Ok(Self {
            quote: InstrumentQuote::new(asset)?,
            leg,
            recovery_rate,
        })
    }

    /// Recovery rate.
    #[must_use]
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }
}

impl PriceableInstrument for CreditDefaultSwap {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Cds
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
        let mut rpv01 = 0.0;
        let mut protection = 0.0;
        let mut q_prev = ctx.curve.value_at(self.leg.start)?;
        for (date, tau) in self.leg.payments.iter().zip(&self.leg.accruals) {
            let df = discount.value_at(*date)?;
            let q = ctx.curve.value_at(*date)?;
            rpv01 += tau * df * 0.5 * (q + q_prev);
            protection += df * (q_prev - q);
            q_prev = q;
        }
        if rpv01 <= 0.0 {
            return Err(CurveError::validation(format!(
                "{}: risky annuity is not positive",
                self.id()
            )));
        }
        Ok((1.0 - self.recovery_rate) * protection / rpv01)
    }
}
