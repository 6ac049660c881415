use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};

/// Timestamps in queries have second precision. Start times are rounded down and end times up so
/// the requested range is never narrowed.
pub fn format_start_time(time: DateTime<Utc>) -> String {
    let floor = time.with_nanosecond(0).unwrap_or(time);
    floor.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn format_end_time(time: DateTime<Utc>) -> String {
    let floor = time.with_nanosecond(0).unwrap_or(time);
    let ceil = if floor < time { floor + Duration::seconds(1) } else { floor };
    ceil.to_rfc3339_opts(SecondsFormat::Secs, true)
}
