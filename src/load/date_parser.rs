use chrono::NaiveDateTime;

/// Format of `start_time` / `end_time` in the hikr.org export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `"YYYY-MM-DD HH:MM:SS"` into a naive timestamp.
///
/// Empty or malformed input yields `None`; the caller stores that as NULL.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}
