//! "How long ago" strings for tweet timestamps.

use jiff::Timestamp;

/// Formats the distance between `then` and `now` without a suffix
/// ("3 hours", not "3 hours ago"). Direction is ignored.
///
/// Each unit is rounded before it is compared, and a unit rounding to one
/// reads as "a minute", "an hour" and so on: under 45 seconds is "a few
/// seconds", then minutes below 45, hours below 22, days below 26, months
/// below 11, then years.
pub fn from_now(then: Timestamp, now: Timestamp) -> String {
    let seconds = (now.as_second() - then.as_second()).unsigned_abs() as f64;
    let minutes = (seconds / 60.0).round();
    let hours = (seconds / 3_600.0).round();
    let days = (seconds / 86_400.0).round();
    let months = (seconds / (86_400.0 * DAYS_PER_MONTH)).round();
    let years = (seconds / (86_400.0 * DAYS_PER_YEAR)).round();

    if seconds < 45.0 {
        "a few seconds".to_owned()
    } else if minutes <= 1.0 {
        "a minute".to_owned()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_owned()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_owned()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_owned()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_owned()
    } else {
        format!("{years} years")
    }
}

/// Average Gregorian month and year.
const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;
const DAYS_PER_YEAR: f64 = 146_097.0 / 400.0;
