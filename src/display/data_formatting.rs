use jiff::tz::TimeZone;
use jiff::Timestamp;

use crate::mutation::capitalize_first;

/// Placeholder for missing values in tables.
pub const MISSING: &str = "-------";

fn ordinal_suffix(day: i8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Format a timestamp as `19th Oct, 2026` in the given zone.
pub fn format_day(ts: Timestamp, tz: &TimeZone) -> String {
    let zoned = ts.to_zoned(tz.clone());
    format!(
        "{}{} {}",
        zoned.day(),
        ordinal_suffix(zoned.day()),
        zoned.strftime("%b, %Y")
    )
}

/// Format a timestamp as `October 19, 2026` in the given zone.
pub fn format_long_date(ts: Timestamp, tz: &TimeZone) -> String {
    let zoned = ts.to_zoned(tz.clone());
    format!("{} {}, {}", zoned.strftime("%B"), zoned.day(), zoned.year())
}

/// Human distance between `ts` and `now`, e.g. `3 hours ago` or `Yesterday`.
///
/// Thresholds round to the nearest unit: under 45 seconds is "a few
/// seconds", under 90 seconds "a minute", under 45 minutes counts minutes,
/// and so on up to years.
pub fn format_relative(ts: Timestamp, now: Timestamp) -> String {
    let delta = now.as_second() - ts.as_second();
    let future = delta < 0;
    let secs = delta.unsigned_abs();

    let minutes = (secs + 30) / 60;
    let hours = (secs + 1800) / 3600;
    let days = (secs + 43_200) / 86_400;

    let phrase = if secs < 45 {
        "a few seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes")
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{hours} hours")
    } else if hours < 36 {
        if !future {
            return "Yesterday".to_string();
        }
        "a day".to_string()
    } else if days < 26 {
        format!("{days} days")
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        let months = ((days as f64) / 30.4).round() as u64;
        format!("{} months", months.max(2))
    } else if days < 548 {
        "a year".to_string()
    } else {
        let years = ((days as f64) / 365.0).round() as u64;
        format!("{} years", years.max(2))
    };

    let text = if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    };
    capitalize_first(&text)
}

/// [`format_day`] in the local zone, or the placeholder when unset.
pub fn day_or_missing(ts: Option<Timestamp>) -> String {
    ts.map(|ts| format_day(ts, &TimeZone::system()))
        .unwrap_or_else(|| MISSING.to_string())
}

/// [`format_long_date`] in the local zone, or the placeholder when unset.
pub fn long_date_or_missing(ts: Option<Timestamp>) -> String {
    ts.map(|ts| format_long_date(ts, &TimeZone::system()))
        .unwrap_or_else(|| MISSING.to_string())
}

/// [`format_relative`] against the current time, or the placeholder when unset.
pub fn relative_or_missing(ts: Option<Timestamp>) -> String {
    ts.map(|ts| format_relative(ts, Timestamp::now()))
        .unwrap_or_else(|| MISSING.to_string())
}

/// Text or the placeholder when empty.
pub fn or_missing(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => MISSING.to_string(),
    }
}
