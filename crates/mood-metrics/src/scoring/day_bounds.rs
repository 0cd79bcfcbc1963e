use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Singapore standard time. A static offset: there are no daylight-saving transitions.
pub const SGT_OFFSET_SECONDS: i32 = 8 * 60 * 60;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Half-open UTC range `[start_utc, end_utc)` covering one UTC+8 calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBounds {
    pub local_date: NaiveDate,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

impl DayBounds {
    pub fn start_iso(&self) -> String {
        self.start_utc.to_rfc3339()
    }

    pub fn end_iso(&self) -> String {
        self.end_utc.to_rfc3339()
    }
}

/// Parses an ISO-8601 timestamp into a UTC instant.
///
/// A trailing `Z` means `+00:00`. Timestamps without an offset are taken to be UTC already,
/// and a bare date is read as midnight UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(head) => format!("{head}+00:00"),
        None => trimmed.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Resolves the UTC+8 calendar day containing `timestamp`.
///
/// Returns `None` for unparsable input; callers skip the dependent lookup in that case.
pub fn sg_day_bounds(timestamp: &str) -> Option<DayBounds> {
    let instant = parse_instant(timestamp)?;
    day_bounds_for(instant)
}

pub fn day_bounds_for(instant: DateTime<Utc>) -> Option<DayBounds> {
    let offset = FixedOffset::east_opt(SGT_OFFSET_SECONDS)?;
    let local_date = instant.with_timezone(&offset).date_naive();
    let local_midnight = offset
        .from_local_datetime(&local_date.and_time(NaiveTime::MIN))
        .single()?;

    let start_utc = local_midnight.with_timezone(&Utc);
    let end_utc = start_utc + Duration::hours(24);

    Some(DayBounds {
        local_date,
        start_utc,
        end_utc,
    })
}
