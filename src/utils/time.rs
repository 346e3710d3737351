use time::OffsetDateTime;
use time::macros::format_description;

/// Current unix time in milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Format a unix-millisecond timestamp for display, `YYYY-MM-DD HH:MM` UTC.
///
/// Falls back to the raw number when the timestamp is out of range.
pub fn format_millis(millis: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    match OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000) {
        Ok(datetime) => datetime
            .format(&format)
            .unwrap_or_else(|_| millis.to_string()),
        Err(_) => millis.to_string(),
    }
}
