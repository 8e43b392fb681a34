//! Calendar helpers shared by the engine.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt::Display;

/// Display pattern for schedule instants in notification bodies.
const DATETIME_DISPLAY_FORMAT: &str = "%-d %b %Y %H:%M";

/// Weekday index with Sunday as 0 and Saturday as 6.
pub fn weekday_index<Tz: TimeZone>(now: &DateTime<Tz>) -> usize {
    now.weekday().num_days_from_sunday() as usize
}

/// Instant of `hour:00` on `date` in `tz`.
///
/// Returns `None` when that wall-clock time does not exist (DST gap).
/// Ambiguous times resolve to the earlier instant.
pub fn local_hour<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, 0, 0)?;
    let local = tz.from_local_datetime(&naive).earliest()?;
    Some(local.with_timezone(&Utc))
}

/// Whether `instant` falls on the same calendar day as `now`, judged in the
/// time zone of `now`.
pub fn same_local_day<Tz: TimeZone>(instant: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    instant.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// Formats an instant for display in `tz`, e.g. `14 May 2024 17:00`.
pub fn format_datetime<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant
        .with_timezone(tz)
        .format(DATETIME_DISPLAY_FORMAT)
        .to_string()
}

/// Parses a timetable time written as `HH:MM`.
pub fn parse_class_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Shortens an on-the-hour timetable time, `08:00` -> `08`.
pub fn format_class_time(value: &str) -> &str {
    value.strip_suffix(":00").unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{
        format_class_time, format_datetime, local_hour, parse_class_time, same_local_day,
        weekday_index,
    };
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn bangkok() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).expect("valid offset")
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        let sunday = bangkok().with_ymd_and_hms(2024, 5, 12, 9, 0, 0).unwrap();
        let tuesday = bangkok().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        assert_eq!(weekday_index(&sunday), 0);
        assert_eq!(weekday_index(&tuesday), 2);
    }

    #[test]
    fn local_hour_converts_wall_clock_to_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let instant = local_hour(&bangkok(), date, 17).expect("17:00 exists");
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap());
    }

    #[test]
    fn same_local_day_uses_the_callers_zone() {
        let now = bangkok().with_ymd_and_hms(2024, 5, 14, 6, 0, 0).unwrap();
        // 23:30 UTC on the 13th is 06:30 on the 14th in Bangkok.
        let early_local = Utc.with_ymd_and_hms(2024, 5, 13, 23, 30, 0).unwrap();
        let previous_local_day = Utc.with_ymd_and_hms(2024, 5, 13, 16, 59, 0).unwrap();
        assert!(same_local_day(&early_local, &now));
        assert!(!same_local_day(&previous_local_day, &now));
    }

    #[test]
    fn format_datetime_renders_in_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap();
        assert_eq!(format_datetime(&instant, &bangkok()), "14 May 2024 17:00");
    }

    #[test]
    fn class_time_helpers() {
        assert!(parse_class_time("08:30").is_some());
        assert!(parse_class_time("8.30").is_none());
        assert!(parse_class_time("25:00").is_none());
        assert_eq!(format_class_time("08:00"), "08");
        assert_eq!(format_class_time("08:30"), "08:30");
    }
}
