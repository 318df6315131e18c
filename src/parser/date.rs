//! Fix timestamp assembly
//!
//! The GPRMC sentence carries the time as `hhmmss` and the date as `ddmmyy`
//! in two separate groups. Both are merged here into one UTC timestamp.

use crate::conversion::expand_two_digit_year;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Merge a time group and a day/month/year date group into a UTC timestamp
///
/// The date arrives in wire order (day first) and the year as two digits.
/// Returns `None` for values that do not form a real calendar date or
/// time of day; nothing is rolled over or clamped.
pub fn assemble_fix_time(
    hour: u32,
    minute: u32,
    second: u32,
    day: u32,
    month: u32,
    year: i32,
) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(expand_two_digit_year(year), month, day)?
        .and_hms_opt(hour, minute, second)?;
    Some(Utc.from_utc_datetime(&naive))
}
