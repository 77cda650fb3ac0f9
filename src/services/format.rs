use chrono::{DateTime, FixedOffset, Utc};

/// `"02:30 PM"`
pub fn clock_time(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%I:%M %p").to_string()
}

/// `"March 5 • Wednesday"` with the given separator between the day and weekday.
pub fn day_label(at: &DateTime<Utc>, offset: &FixedOffset, separator: &str) -> String {
    let local = at.with_timezone(offset);
    format!("{} {separator} {}", local.format("%B %-d"), local.format("%A"))
}

/// `"2025-03-05"`
pub fn short_date(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%Y-%m-%d").to_string()
}

/// `"2025-03-05 14:30"`
pub fn stamp(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%Y-%m-%d %H:%M").to_string()
}

/// `"9:00 AM"`, with midnight and noon shown as 12.
pub fn to_12_hour(hour: u32) -> String {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h}:00 {suffix}")
}

/// Loyalty points without a trailing `.0` for whole numbers.
pub fn points(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score:.1}")
    }
}

pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}
