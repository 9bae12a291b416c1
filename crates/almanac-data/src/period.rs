//! Monthly period normalization.
//!
//! Every source is keyed by the first calendar day of the month containing its
//! observation date. Applying the same truncation to all three tables is what
//! makes their aggregation keys line up for the merge.

use chrono::{Datelike, Days, NaiveDate};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Returns the first day of the calendar month containing `date`.
///
/// # Examples
///
/// ```
/// use almanac_data::period::month_start;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
/// assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// ```
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Convert a date to days since 1970-01-01, the physical representation of a Polars `Date`.
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`to_epoch_days`]. Returns `None` outside chrono's representable range.
pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}
