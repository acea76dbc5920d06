//! Interest rate futures on IMM dates.

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::{DayCount, DayCountConvention};
use tenor_core::Date;

use super::{
    asset_day_count, simple_forward_rate, InstrumentKind, InstrumentQuote, PriceableInstrument,
    PricingContext,
};
use crate::error::{CurveError, CurveResult};
use crate::quotes::QuotedAsset;

/// Months covered by one contract.
const CONTRACT_MONTHS: i32 = 3;

/// Third Wednesday of the month.
///
/// ```rust
/// use tenor_core::Date;
/// use tenor_curves::instruments::imm_date;
///
/// assert_eq!(imm_date(2024, 3).unwrap(), Date::from_ymd(2024, 3, 20).unwrap());
/// ```
pub fn imm_date(year: i32, month: u32) -> CurveResult<Date> {
    let first = Date::from_ymd(year, month, 1)?;
    let weekday = i64::from(first.weekday().num_days_from_monday());
    let days_to_wednesday = (2 - weekday + 7) % 7;
    Ok(first.add_days(days_to_wednesday + 14))
}

/// Month of a futures month code (`F` = January ... `Z` = December).
fn month_from_code(code: char) -> Option<u32> {
    const CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];
    CODES
        .iter()
        .position(|c| *c == code.to_ascii_uppercase())
        .map(|i| i as u32 + 1)
}

/// Start date of the contract coded `code`, e.g. `H4` or `Z25`.
///
/// A single year digit resolves to the first contract on or after
/// `base_date` with that digit.
pub(crate) fn contract_start(code: &str, base_date: Date) -> CurveResult<Date> {
    let invalid = || CurveError::validation(format!("invalid futures code '{code}'"));
    let mut chars = code.trim().chars();
    let month = chars.next().and_then(month_from_code).ok_or_else(invalid)?;
    let digits: String = chars.collect();
    let year_digits: i32 = digits.parse().map_err(|_| invalid())?;

    match digits.len() {
        1 => {
            let decade = base_date.year() - base_date.year().rem_euclid(10);
            let start = imm_date(decade + year_digits, month)?;
            if start < base_date {
                imm_date(decade + year_digits + 10, month)
            } else {
                Ok(start)
            }
        }
        2 => imm_date(2000 + year_digits, month),
        _ => Err(invalid()),
    }
}

/// A three-month rate future.
///
/// Quotes are usually `IRFuturesPrice` (9500 for 5%) and normalize to the
/// decimal rate. The implied rate is the simple forward over the contract
/// quarter; no convexity adjustment is applied.
#[derive(Debug, Clone)]
pub struct RateFuture {
    quote: InstrumentQuote,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
}

impl RateFuture {
    /// Creates a future covering `start` plus three months, with the end
    /// adjusted modified-following on `calendar`.
    pub fn new(asset: QuotedAsset, start: Date, calendar: &dyn Calendar) -> CurveResult<Self> {
        let day_count = asset_day_count(&asset)?;
        let end = calendar.adjust(
            start.add_months(CONTRACT_MONTHS)?,
            BusinessDayConvention::ModifiedFollowing,
        );
        Ok(Self {
            quote: InstrumentQuote::new(asset)?,
            start,
            end,
            day_count,
        })
    }

    /// Contract start (IMM date).
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start
    }
}

impl PriceableInstrument for RateFuture {
    fn id(&self) -> &str {
        &self.quote.asset.id
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::IrFuture
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
    use crate::quotes::QuoteUnits;
    use approx::assert_relative_eq;
    use tenor_core::calendars::WeekendCalendar;

    #[test]
    fn test_imm_dates() {
        assert_eq!(imm_date(2024, 6).unwrap(), Date::from_ymd(2024, 6, 19).unwrap());
        assert_eq!(imm_date(2024, 12).unwrap(), Date::from_ymd(2024, 12, 18).unwrap());
        assert_eq!(imm_date(2025, 3).unwrap(), Date::from_ymd(2025, 3, 19).unwrap());
    }

    #[test]
    fn test_contract_codes() {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        assert_eq!(contract_start("H4", base).unwrap(), imm_date(2024, 3).unwrap());
        assert_eq!(contract_start("Z5", base).unwrap(), imm_date(2025, 12).unwrap());
        // H3 has already expired, so it rolls to the next decade
        assert_eq!(contract_start("H3", base).unwrap(), imm_date(2033, 3).unwrap());
        assert_eq!(contract_start("u25", base).unwrap(), imm_date(2025, 9).unwrap());
        assert!(contract_start("A4", base).is_err());
        assert!(contract_start("H", base).is_err());
    }

    #[test]
    fn test_price_quote_normalizes() {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        let asset = QuotedAsset::with_market_quote("AUD-IRFuture-IR-H4", 9500.0, QuoteUnits::IRFuturesPrice);
        let future =
            RateFuture::new(asset, contract_start("H4", base).unwrap(), &WeekendCalendar).unwrap();
        assert_relative_eq!(future.market_quote(), 0.05, epsilon = 1e-15);
        assert_eq!(future.risk_maturity_date(), Date::from_ymd(2024, 6, 20).unwrap());
    }

    #[test]
    fn test_contract_end_is_business_day() {
        // 29 June 2024 is a Saturday; rolling forward would leave June
        let start = Date::from_ymd(2024, 3, 29).unwrap();
        let asset = QuotedAsset::with_market_quote("AUD-IRFuture-IR-M4", 9500.0, QuoteUnits::IRFuturesPrice);
        let future = RateFuture::new(asset, start, &WeekendCalendar).unwrap();
        assert_eq!(future.risk_maturity_date(), Date::from_ymd(2024, 6, 28).unwrap());
    }
}
