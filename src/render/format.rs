//! Best-effort timestamp formatting. Every function returns `None` instead of
//! failing so callers can substitute their own fallback label.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

pub const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y/%m/%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parse RFC 3339, or a naive ISO-8601 datetime/date taken as local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest()
}

pub fn from_epoch_ms(ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(ms).single()
}

/// Timestamps in the dialogue log are either ISO text or epoch milliseconds.
pub fn parse_value(value: &serde_json::Value) -> Option<DateTime<Local>> {
    match value {
        serde_json::Value::String(s) => parse_timestamp(s),
        serde_json::Value::Number(n) => n.as_i64().and_then(from_epoch_ms),
        _ => None,
    }
}

pub fn datetime(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format(DATETIME_FORMAT).to_string())
}

pub fn date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format(DATE_FORMAT).to_string())
}

pub fn time_of(value: &serde_json::Value) -> Option<String> {
    parse_value(value).map(|dt| dt.format(TIME_FORMAT).to_string())
}

pub fn epoch_ms(ms: i64) -> Option<String> {
    from_epoch_ms(ms).map(|dt| dt.format(DATETIME_FORMAT).to_string())
}
