use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::market_data::{Timeframe, Timestamp};

/// Parse one `dates` entry from the series payload.
///
/// Accepts RFC 3339 (`2024-01-05T00:00:00Z`), a bare date (`2024-01-05`,
/// taken as UTC midnight) and a zone-less datetime (`2024-01-05T14:30:00`).
/// Anything else, including pre-epoch dates, is `None` and the row drops.
pub fn parse_series_date(raw: &str) -> Option<Timestamp> {
    let trimmed = raw.trim();
    let millis = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        dt.timestamp_millis()
    } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        dt.and_utc().timestamp_millis()
    } else {
        return None;
    };
    (millis >= 0).then(|| Timestamp::from_millis(millis as u64))
}

/// UTC instant in the form CSV exports carry, `2024-01-05T00:00:00Z`.
pub fn format_timestamp_iso(ts: Timestamp) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts.value() as i64) {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => ts.value().to_string(),
    }
}

/// Axis tick label. Multi-year ranges label by month, shorter ones by day.
pub fn format_date_label(ts: Timestamp, timeframe: Timeframe) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts.value() as i64) {
        Some(dt) if timeframe.spans_years() => dt.format("%b %Y").to_string(),
        Some(dt) => dt.format("%d %b").to_string(),
        None => ts.value().to_string(),
    }
}

/// Full date for the hover readout, `2024-01-05`.
pub fn format_date_full(ts: Timestamp) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts.value() as i64) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => ts.value().to_string(),
    }
}
