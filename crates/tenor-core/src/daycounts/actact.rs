//! Actual/Actual ISDA.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::{is_leap_year, Date};

/// Actual/Actual ISDA.
///
/// The period is split at year boundaries; days falling in a leap year are
/// divided by 366 and the rest by 365.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start > end {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start;
        for year in start.year()..=end.year() {
            let next = if year == end.year() {
                end
            } else {
                match Date::from_ymd(year + 1, 1, 1) {
                    Ok(d) => d,
                    Err(_) => break,
                }
            };
            let basis = if is_leap_year(year) { 366 } else { 365 };
            total += Decimal::from(current.days_between(&next)) / Decimal::from(basis);
            current = next;
        }
        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
