use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a granule's temporal bounds for display.
///
/// Returns `[start, end]`; a bound that is missing or cannot be parsed is `None`.
pub fn format_temporal(time_start: Option<&str>, time_end: Option<&str>) -> [Option<String>; 2] {
    [
        time_start.and_then(format_timestamp),
        time_end.and_then(format_timestamp),
    ]
}

/// Render a CMR timestamp as `YYYY-MM-DD HH:MM:SS` in UTC
pub fn format_timestamp(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|ts| ts.format(DISPLAY_FORMAT).to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Some providers omit the offset
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
