use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

/// Peru does not observe daylight saving time, Lima is always UTC-5
const LIMA_OFFSET_SECONDS: i32 = 5 * 3600;

const SPANISH_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Business-calendar conversions. All timestamps are stored as UTC; calendar
/// boundaries (month starts, report buckets) follow Lima local time.
pub struct TimezoneConverter;

impl TimezoneConverter {
    pub fn lima_offset() -> FixedOffset {
        FixedOffset::west_opt(LIMA_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
    }

    /// Convert UTC timestamp to America/Lima
    pub fn utc_to_lima(utc_time: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc_time.with_timezone(&Self::lima_offset())
    }

    /// Convert a Lima local timestamp back to UTC
    pub fn lima_to_utc(lima_time: DateTime<FixedOffset>) -> DateTime<Utc> {
        lima_time.with_timezone(&Utc)
    }

    /// Format timestamp as ISO 8601 UTC for API responses
    pub fn format_iso8601_utc(utc_time: DateTime<Utc>) -> String {
        utc_time.to_rfc3339()
    }
}

/// Calendar month (year, month 1-12) of a timestamp in Lima time
pub fn month_key(utc_time: DateTime<Utc>) -> (i32, u32) {
    let local = TimezoneConverter::utc_to_lima(utc_time);
    (local.year(), local.month())
}

/// First instant of the Lima calendar month containing `now`, as UTC
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = month_key(now);
    start_of_day(year, month, 1)
}

/// Lima midnight of the given date, as UTC
pub fn start_of_day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    let offset = TimezoneConverter::lima_offset();
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);
    let midnight = date.and_time(NaiveTime::MIN);
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(TimezoneConverter::lima_to_utc)
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// The `count` calendar months ending with the month of `now`, oldest first
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<(i32, u32)> {
    let (year, month) = month_key(now);
    let anchor = year * 12 + (month as i32 - 1);

    (0..count as i32)
        .rev()
        .map(|back| {
            let index = anchor - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// UTC midnight of a calendar date; used for fixed seed timestamps
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_default()
}

/// Short Spanish month label ("ene", "feb", ...)
pub fn spanish_month_abbrev(month: u32) -> &'static str {
    SPANISH_MONTHS
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("")
}
