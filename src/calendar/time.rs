use crate::error::{format_error, AppResult};
use chrono::{DateTime, Duration, FixedOffset, SecondsFormat};

/// Every service takes place in Singapore time (UTC+8)
const LOCAL_OFFSET: &str = "+08:00";

/// Every service blocks out three hours on the calendar
const EVENT_DURATION_HOURS: i64 = 3;

/// Left-pad a time-of-day string to HH:MM
///
/// The spreadsheet stores morning times without a leading zero ("9:00").
pub fn pad_start_time(time: &str) -> String {
    format!("{:0>5}", time)
}

/// Combine a local date and time-of-day into the event's start and end instants
///
/// Returns both as RFC3339 strings with second precision, e.g.
/// ("2024-03-10T09:00:00+08:00", "2024-03-10T12:00:00+08:00").
pub fn event_window(date: &str, time: &str) -> AppResult<(String, String)> {
    let start = parse_local(date, time)?;
    let end = start + Duration::hours(EVENT_DURATION_HOURS);

    Ok((
        start.to_rfc3339_opts(SecondsFormat::Secs, false),
        end.to_rfc3339_opts(SecondsFormat::Secs, false),
    ))
}

/// Parse a local date (YYYY-MM-DD) and time-of-day into an offset-qualified instant
fn parse_local(date: &str, time: &str) -> AppResult<DateTime<FixedOffset>> {
    let candidate = format!("{}T{}:00{}", date, pad_start_time(time), LOCAL_OFFSET);

    DateTime::parse_from_rfc3339(&candidate)
        .map_err(|e| format_error(&format!("Failed to parse '{}': {}", candidate, e)))
}
