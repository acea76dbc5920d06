//! # Tenor Core
//!
//! Foundational types shared by the Tenor term-structure crates:
//!
//! - **Dates**: [`Date`] newtype with month/year arithmetic and tenor offsets
//! - **Periods**: [`Period`] parsing of market tenors (`ON`, `1W`, `3M`, `10Y`)
//! - **Day Counts**: ACT/360, ACT/365F, ACT/ACT ISDA and 30/360
//! - **Calendars**: the [`Calendar`](calendars::Calendar) capability and business-day rolling
//!
//! Holiday calendars are supplied by the host; only a weekend calendar lives here.
//!
//! ## Example
//!
//! ```rust
//! use tenor_core::prelude::*;
//!
//! let base = Date::from_ymd(2024, 1, 2).unwrap();
//! let one_month: Period = "1M".parse().unwrap();
//! assert_eq!(base.add_period(one_month).unwrap(), Date::from_ymd(2024, 2, 2).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Compounding, Date, Frequency, Period, TimeUnit};
}

pub use error::{CoreError, CoreResult};
pub use types::{Date, Period};
