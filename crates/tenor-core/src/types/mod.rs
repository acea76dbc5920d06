//! Domain types: dates, tenor periods, frequencies and compounding.

mod date;
mod frequency;
mod period;

pub use date::Date;
pub(crate) use date::is_leap_year;
pub use frequency::{Compounding, Frequency};
pub use period::{Period, TimeUnit};
