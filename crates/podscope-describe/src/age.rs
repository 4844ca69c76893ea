use chrono::{DateTime, NaiveDateTime, Utc};

/// Shown when a timestamp is missing or cannot be parsed
const UNKNOWN_AGE: &str = "-";

/// Parse a timestamp as emitted by the backend.
///
/// Accepts RFC 3339 as well as the `2024-01-15 10:30:00.123456+00:00`
/// form produced by stringifying a Python datetime. Naive timestamps are
/// taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%:z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Format elapsed seconds using the largest whole unit (s, m, h, d).
pub fn format_elapsed_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// Age of `timestamp` relative to `now`, e.g. `45s`, `1m`, `1h`, `1d`
pub fn format_age(timestamp: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(timestamp) {
        Some(created) => format_elapsed_seconds((now - created).num_seconds()),
        None => UNKNOWN_AGE.to_string(),
    }
}

/// Age of `timestamp` relative to the system clock
pub fn format_age_now(timestamp: &str) -> String {
    format_age(timestamp, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ago(seconds: i64) -> String {
        (now() - Duration::seconds(seconds)).to_rfc3339()
    }

    #[test]
    fn test_age_units() {
        assert_eq!(format_age(&ago(45), now()), "45s");
        assert_eq!(format_age(&ago(90), now()), "1m");
        assert_eq!(format_age(&ago(3700), now()), "1h");
        assert_eq!(format_age(&ago(90000), now()), "1d");
    }

    #[test]
    fn test_age_boundaries() {
        assert_eq!(format_elapsed_seconds(0), "0s");
        assert_eq!(format_elapsed_seconds(59), "59s");
        assert_eq!(format_elapsed_seconds(60), "1m");
        assert_eq!(format_elapsed_seconds(3599), "59m");
        assert_eq!(format_elapsed_seconds(86_399), "23h");
        assert_eq!(format_elapsed_seconds(86_400), "1d");
    }

    #[test]
    fn test_future_timestamp_clamps() {
        let future = (now() + Duration::seconds(30)).to_rfc3339();
        assert_eq!(format_age(&future, now()), "0s");
    }

    #[test]
    fn test_python_datetime_format() {
        assert_eq!(format_age("2024-06-01 11:00:00+00:00", now()), "1h");
        assert_eq!(format_age("2024-06-01 11:59:30.250000+00:00", now()), "29s");
        assert_eq!(format_age("2024-05-30 12:00:00", now()), "2d");
    }

    #[test]
    fn test_unparseable_timestamp() {
        assert_eq!(format_age("", now()), "-");
        assert_eq!(format_age("None", now()), "-");
    }

    #[test]
    fn test_age_against_system_clock() {
        assert!(format_age_now("2001-01-01T00:00:00Z").ends_with('d'));
        assert_eq!(format_age_now("garbage"), "-");
    }
}
