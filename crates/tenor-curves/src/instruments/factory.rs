//! Instrument construction from quoted assets.

use std::sync::Arc;

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::{Date, Period};

use super::future::contract_start;
use super::{
    BasisSwap, CreditDefaultSwap, Deposit, ForwardContract, Fra, InstrumentKind,
    InterestRateSwap, PriceableInstrument, RateFuture,
};
use crate::error::{CurveError, CurveResult};
use crate::quotes::QuotedAsset;

/// Builds priceable instruments from quoted assets.
pub trait InstrumentFactory: Send + Sync {
    /// Creates the instrument for `asset`, resolving its dates from
    /// `base_date` with `calendar`.
    fn create(
        &self,
        asset: &QuotedAsset,
        base_date: Date,
        calendar: &dyn Calendar,
    ) -> CurveResult<Arc<dyn PriceableInstrument>>;
}

/// Factory reading the instrument from identifiers of the form
/// `{currency}-{type}-{tenor}`.
///
/// | Identifier | Dates |
/// |------------|-------|
/// | `AUD-Deposit-1M` | base to base + 1M |
/// | `AUD-Fra-3M-6M` | base + 3M to base + 6M |
/// | `AUD-IRFuture-IR-H4` | IMM date of March 2024 plus 3M |
/// | `AUD-IRSwap-5Y`, `AUD-BasisSwap-5Y`, `AUD-CDS-5Y` | base to base + 5Y |
/// | `BHP-EquityForward-6M`, `AUDUSD-FxForward-3M` | matures base + tenor |
///
/// Dates after the base date are rolled modified-following.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInstrumentFactory;

impl DefaultInstrumentFactory {
    /// Creates the factory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn tenor(asset: &QuotedAsset, text: &str) -> CurveResult<Period> {
    text.parse::<Period>().map_err(|e| {
        CurveError::validation(format!("{}: bad tenor '{text}': {e}", asset.id))
    })
}

fn roll(base: Date, period: Period, calendar: &dyn Calendar) -> CurveResult<Date> {
    Ok(calendar.adjust(
        base.add_period(period)?,
        BusinessDayConvention::ModifiedFollowing,
    ))
}

impl InstrumentFactory for DefaultInstrumentFactory {
    fn create(
        &self,
        asset: &QuotedAsset,
        base_date: Date,
        calendar: &dyn Calendar,
    ) -> CurveResult<Arc<dyn PriceableInstrument>> {
        let malformed = || {
            CurveError::validation(format!(
                "asset id '{}' is not of the form CCY-Type-Tenor",
                asset.id
            ))
        };
        let mut parts = asset.id.splitn(3, '-');
        let _currency = parts.next().ok_or_else(malformed)?;
        let kind: InstrumentKind = parts.next().ok_or_else(malformed)?.parse()?;
        let rest = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let asset = asset.clone();

        let instrument: Arc<dyn PriceableInstrument> = match kind {
            InstrumentKind::Deposit => {
                let end = roll(base_date, tenor(&asset, rest)?, calendar)?;
                Arc::new(Deposit::new(asset, base_date, end)?)
            }
            InstrumentKind::Fra => {
                let (from, to) = rest.split_once('-').ok_or_else(malformed)?;
                let start = roll(base_date, tenor(&asset, from)?, calendar)?;
                let end = roll(base_date, tenor(&asset, to)?, calendar)?;
                if end <= start {
                    return Err(CurveError::validation(format!(
                        "{}: FRA ends before it starts",
                        asset.id
                    )));
                }
                Arc::new(Fra::new(asset, start, end)?)
            }
            InstrumentKind::IrFuture => {
                let code = rest.rsplit('-').next().ok_or_else(malformed)?;
                let start = contract_start(code, base_date)?;
                Arc::new(RateFuture::new(asset, start, calendar)?)
            }
            InstrumentKind::IrSwap => {
                let end = roll(base_date, tenor(&asset, rest)?, calendar)?;
                Arc::new(InterestRateSwap::new(asset, base_date, end, calendar)?)
            }
            InstrumentKind::BasisSwap => {
                let end = roll(base_date, tenor(&asset, rest)?, calendar)?;
                Arc::new(BasisSwap::new(asset, base_date, end, calendar)?)
            }
            InstrumentKind::Cds => {
                let end = roll(base_date, tenor(&asset, rest)?, calendar)?;
                Arc::new(CreditDefaultSwap::new(asset, base_date, end, calendar)?)
            }
            InstrumentKind::EquityForward | InstrumentKind::FxForward => {
                let maturity = roll(base_date, tenor(&asset, rest)?, calendar)?;
                Arc::new(ForwardContract::new(asset, kind, maturity)?)
            }
        };
        Ok(instrument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::QuoteUnits;
    use tenor_core::calendars::WeekendCalendar;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn create(id: &str, units: QuoteUnits, value: f64) -> CurveResult<Arc<dyn PriceableInstrument>> {
        let asset = QuotedAsset::with_market_quote(id, value, units);
        DefaultInstrumentFactory.create(&asset, base(), &WeekendCalendar)
    }

    #[test]
    fn test_kinds_and_maturities() {
        let deposit = create("AUD-Deposit-1M", QuoteUnits::Rate, 5.3).unwrap();
        assert_eq!(deposit.kind(), InstrumentKind::Deposit);
        assert_eq!(deposit.risk_maturity_date(), Date::from_ymd(2024, 2, 2).unwrap());

        let fra = create("AUD-Fra-3M-6M", QuoteUnits::Rate, 5.0).unwrap();
        assert_eq!(fra.risk_maturity_date(), Date::from_ymd(2024, 7, 2).unwrap());

        let future = create("AUD-IRFuture-IR-H4", QuoteUnits::IRFuturesPrice, 9500.0).unwrap();
        assert_eq!(future.kind(), InstrumentKind::IrFuture);
        assert_eq!(future.risk_maturity_date(), Date::from_ymd(2024, 6, 20).unwrap());

        let swap = create("AUD-IRSwap-1Y", QuoteUnits::DecimalRate, 0.0495).unwrap();
        assert_eq!(swap.risk_maturity_date(), Date::from_ymd(2025, 1, 2).unwrap());

        let cds = create("AUD-CDS-5Y", QuoteUnits::DecimalRate, 0.01).unwrap();
        assert_eq!(cds.kind(), InstrumentKind::Cds);

        let fx = create("AUDUSD-FxForward-3M", QuoteUnits::FxRate, 0.66).unwrap();
        assert_eq!(fx.kind(), InstrumentKind::FxForward);
        assert_eq!(fx.risk_maturity_date(), Date::from_ymd(2024, 4, 2).unwrap());
    }

    #[test]
    fn test_weekend_maturity_rolls() {
        // 2024-01-02 + 4M = 2024-05-02 (Thursday); + 5M = 2024-06-02 (Sunday)
        let deposit = create("AUD-Deposit-5M", QuoteUnits::Rate, 5.0).unwrap();
        assert_eq!(deposit.risk_maturity_date(), Date::from_ymd(2024, 6, 3).unwrap());
    }

    #[test]
    fn test_malformed_ids() {
        assert!(create("AUD", QuoteUnits::Rate, 5.0).is_err());
        assert!(create("AUD-Deposit", QuoteUnits::Rate, 5.0).is_err());
        assert!(create("AUD-Swaption-5Y", QuoteUnits::Rate, 5.0).is_err());
        assert!(create("AUD-IRSwap-5Q", QuoteUnits::Rate, 5.0).is_err());
        assert!(create("AUD-Fra-6M-3M", QuoteUnits::Rate, 5.0).is_err());
    }

    #[test]
    fn test_missing_quote() {
        let asset = QuotedAsset::new("AUD-Deposit-1M");
        let err = DefaultInstrumentFactory
            .create(&asset, base(), &WeekendCalendar)
            .unwrap_err();
        assert!(matches!(err, CurveError::MissingQuote { .. }));
    }
}
