use crate::error::{other_error, AppResult, Error};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse a lesson time range such as `20:15-21:15`
pub fn parse_time_range(range: &str) -> Option<((u32, u32), (u32, u32))> {
    let (start, end) = range.split_once('-')?;
    Some((parse_time(start)?, parse_time(end)?))
}

/// Resolve a wall-clock time on a date in the given timezone
pub fn local_datetime(date: NaiveDate, (hour, minute): (u32, u32), tz: &Tz) -> AppResult<DateTime<Tz>> {
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| other_error("Failed to create datetime"))?;
    from_local(&naive, tz)
}

fn from_local(naive: &NaiveDateTime, tz: &Tz) -> AppResult<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        // Repeated hour at a DST change, take the first occurrence
        chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        chrono::LocalResult::None => Err(other_error(&format!(
            "{} does not exist in {}",
            naive,
            tz.name()
        ))),
    }
}

/// Parse a backend timestamp into the display timezone.
///
/// RFC 3339 values keep their instant. Values without an offset are taken as
/// wall-clock time in `tz`.
pub fn parse_backend_timestamp(raw: &str, tz: &Tz) -> AppResult<DateTime<Tz>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(tz));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return from_local(&naive, tz);
        }
    }

    Err(Error::Serialization(format!("Invalid timestamp: {:?}", raw)))
}

/// Truncate to the start of the hour
pub fn start_of_hour(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.with_minute(0)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Default time range for a new event created without a selected slot
pub fn default_slot(now: DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let start = start_of_hour(now) + Duration::hours(1);
    (start, start + Duration::hours(1))
}

/// Format an event span, e.g. `2024-01-01 20:15-21:15`
pub fn format_span(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String {
    if start.date_naive() == end.date_naive() {
        format!("{} {}-{}", start.format("%Y-%m-%d"), start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!("{} - {}", start.format("%Y-%m-%d %H:%M"), end.format("%Y-%m-%d %H:%M"))
    }
}
