//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Calendar;
use crate::error::CoreError;
use crate::types::Date;

/// How to roll a date that falls on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// Leave the date as is.
    Unadjusted,
    /// Next business day.
    Following,
    /// Next business day unless that crosses into the next month.
    #[default]
    ModifiedFollowing,
    /// Previous business day.
    Preceding,
}

impl FromStr for BusinessDayConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '_'], "").as_str() {
            "NONE" | "UNADJUSTED" => Ok(Self::Unadjusted),
            "FOLLOWING" | "F" => Ok(Self::Following),
            "MODFOLLOWING" | "MODIFIEDFOLLOWING" | "MF" => Ok(Self::ModifiedFollowing),
            "PRECEDING" | "P" => Ok(Self::Preceding),
            _ => Err(CoreError::unknown_convention("business day convention", s)),
        }
    }
}

pub(super) fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> Date {
    if calendar.is_business_day(date) {
        return date;
    }
    match convention {
        BusinessDayConvention::Unadjusted => date,
        BusinessDayConvention::Following => roll(date, 1, calendar),
        BusinessDayConvention::ModifiedFollowing => {
            let next = roll(date, 1, calendar);
            if next.month() == date.month() {
                next
            } else {
                roll(date, -1, calendar)
            }
        }
        BusinessDayConvention::Preceding => roll(date, -1, calendar),
    }
}

fn roll<C: Calendar + ?Sized>(mut date: Date, step: i64, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(step);
    }
    date
}
