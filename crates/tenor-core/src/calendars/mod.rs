//! Business-day calendars.
//!
//! Holiday data is an external concern: hosts implement [`Calendar`] over
//! their own holiday service and hand it to curve builds. This module only
//! provides the trait, the rolling conventions, a weekend-only calendar and
//! a fixed-list calendar for tests and simple setups.

mod conventions;

use std::collections::BTreeSet;

pub use conventions::BusinessDayConvention;

use crate::types::Date;

/// A business-day calendar.
pub trait Calendar: Send + Sync {
    /// Name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Rolls a date onto a business day according to `convention`.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Moves a date by a number of business days.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let step: i64 = if days >= 0 { 1 } else { -1 };
        let mut remaining = days.abs();
        let mut result = date;
        while remaining > 0 {
            result = result.add_days(step);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }
        result
    }
}

/// Calendar whose only holidays are Saturdays and Sundays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Weekend calendar with an explicit list of additional holidays.
#[derive(Debug, Clone, Default)]
pub struct HolidayListCalendar {
    name: String,
    holidays: BTreeSet<Date>,
}

impl HolidayListCalendar {
    /// Creates a calendar from a name and a set of holiday dates.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl Calendar for HolidayListCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.holidays.contains(&date)
    }
}
