use chrono::{DateTime, FixedOffset, SecondsFormat};

pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn datetime_to_string_opt(datetime: Option<DateTime<FixedOffset>>) -> Option<String> {
    datetime.map(datetime_to_string)
}

/// RFC 3339 input, e.g. "2025-06-01T19:30:00+00:00".
pub fn parse_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}
