use chrono::{DateTime, Duration, Timelike, Utc};

use crate::models::LatLng;

/// Byte size units, 1024 apart
const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count for display, e.g. `1.5 KB`.
/// Trailing zeros after the decimal point are dropped.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut i = 0;
    let mut unit = 1_u128;
    while i < SIZE_UNITS.len() - 1 && u128::from(bytes) >= unit * 1024 {
        unit *= 1024;
        i += 1;
    }
    let scaled = bytes as f64 / unit as f64;

    let mut number = format!("{:.*}", decimals, scaled);
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{} {}", number, SIZE_UNITS[i])
}

/// Format a time of day as 12-hour `h:mm am|pm`
pub fn format_ampm<T: Timelike>(time: &T) -> String {
    let hours = time.hour();
    let suffix = if hours >= 12 { "pm" } else { "am" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hours, time.minute(), suffix)
}

pub fn add_hours(date_time: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    date_time + Duration::hours(hours)
}

/// Keep the date of `existing` but take hour and minute from `new_time`.
/// Seconds and sub-seconds are zeroed.
pub fn update_date_with_new_time<T: Timelike>(existing: DateTime<Utc>, new_time: &T) -> DateTime<Utc> {
    existing
        .date_naive()
        .and_hms_opt(new_time.hour(), new_time.minute(), 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(existing)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

/// Build a URL that opens `coordinates` in the platform's maps application
pub fn maps_url(coordinates: LatLng, label: &str, platform: Platform) -> String {
    let lat_lng = format!("{},{}", coordinates.latitude, coordinates.longitude);
    match platform {
        Platform::Ios => format!("maps:0,0?q={}@{}", label, lat_lng),
        Platform::Android => format!("geo:0,0?q={}({})", lat_lng, label),
    }
}

/// Format a phone number for display
/// Handles various input formats and normalizes to (XXX) XXX-XXXX
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => {
            format!("({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..11])
        }
        _ => phone.to_string(),
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
