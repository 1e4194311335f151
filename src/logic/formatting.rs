//! Formatting and display logic
//!
//! Pure functions for formatting data for human-readable display.

use chrono::{DateTime, Utc};

/// How often relative-time labels are recomputed while the UI is running
pub const RELATIVE_TIME_REFRESH_SECS: u64 = 15;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Format the age of a file relative to `now`
///
/// Anything created within the last minute (or, with clock skew, in the
/// future) is "just now". Older timestamps use the largest whole unit.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use filtersnatch::logic::formatting::format_relative_time;
///
/// let now = Utc::now();
/// assert_eq!(format_relative_time(now - Duration::seconds(30), now), "just now");
/// assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5 minutes ago");
/// assert_eq!(format_relative_time(now - Duration::days(2), now), "2 days ago");
/// ```
pub fn format_relative_time(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - created).num_seconds();
    if elapsed <= MINUTE {
        return "just now".to_string();
    }

    let (count, unit) = if elapsed < HOUR {
        (elapsed / MINUTE, "minute")
    } else if elapsed < DAY {
        (elapsed / HOUR, "hour")
    } else if elapsed < WEEK {
        (elapsed / DAY, "day")
    } else if elapsed < MONTH {
        (elapsed / WEEK, "week")
    } else if elapsed < YEAR {
        (elapsed / MONTH, "month")
    } else {
        (elapsed / YEAR, "year")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
