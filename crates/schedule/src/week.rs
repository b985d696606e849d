//! Teaching-week arithmetic.

use chrono::{Datelike, NaiveDate};

/// Day labels indexed by ISO weekday (Monday = index 0).
pub const DAY_LABELS: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// 1-based teaching week containing `today`.
///
/// The start date is day 0 of week 1 and every week is exactly seven days.
/// Returns `0` before the semester starts.
pub fn current_week(start_date: NaiveDate, today: NaiveDate) -> u32 {
    if today < start_date {
        return 0;
    }
    let days = (today - start_date).num_days();
    (days / 7) as u32 + 1
}

/// Day-of-week label for `date` from [`DAY_LABELS`].
pub fn weekday_label(date: NaiveDate) -> &'static str {
    DAY_LABELS[date.weekday().num_days_from_monday() as usize]
}
