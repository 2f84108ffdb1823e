// Time utility functions
// Timezone-aware helpers shared by the grid and display code

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Parse an IANA zone name. Returns None for an unknown zone so callers can
/// degrade to a UTC fallback instead of failing.
pub fn parse_zone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

/// Absolute (UTC) instant of local midnight on the given calendar date in
/// the given zone. If midnight does not exist locally (DST spring-forward
/// gap), the earliest valid local time is used.
pub fn start_of_day_in(zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is a valid time");
    match zone.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // Gap day: walk forward to the first representable local time
            let mut candidate = midnight;
            loop {
                candidate += Duration::minutes(30);
                if let Some(dt) = zone.from_local_datetime(&candidate).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
        }
    }
}

/// Absolute (UTC) instant of local midnight "today" in the given zone.
/// Anchors the availability grid window.
pub fn start_of_today_in(zone: Tz, now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day_in(zone, now.with_timezone(&zone).date_naive())
}

/// Render an instant as local wall-clock time in the named zone.
/// An unknown zone falls back to UTC rendering rather than failing.
pub fn format_in_zone(instant: DateTime<Utc>, zone_name: &str, use_24_hour: bool) -> String {
    let pattern = if use_24_hour { "%H:%M" } else { "%-I:%M %p" };
    match parse_zone(zone_name) {
        Some(zone) => instant.with_timezone(&zone).format(pattern).to_string(),
        None => {
            log::warn!("Unknown timezone {zone_name}, falling back to UTC");
            instant.format(pattern).to_string()
        }
    }
}

/// The top of the next hour; the default shared selected time when a
/// meeting view opens
pub fn next_full_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .expect("truncation keeps the time valid");
    truncated + Duration::hours(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn test_parse_zone() {
        assert!(parse_zone("Australia/Sydney").is_some());
        assert!(parse_zone("Not/AZone").is_none());
    }

    #[test]
    fn test_start_of_today_offset_zone() {
        // 2025-03-10 01:00 UTC is 2025-03-10 12:00 in Sydney (UTC+11)
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let zone: Tz = "Australia/Sydney".parse().unwrap();

        let start = start_of_today_in(zone, now);
        // Sydney midnight on Mar 10 is 13:00 UTC on Mar 9
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 9, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_today_day_boundary() {
        // 23:30 UTC is already "tomorrow" in Sydney
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 23, 30, 0).unwrap();
        let zone: Tz = "Australia/Sydney".parse().unwrap();

        let start = start_of_today_in(zone, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 9, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_skips_dst_gap() {
        // Santiago midnight on Sep 7 2025 does not exist; clocks jump
        // straight from 00:00 to 01:00 (-04 to -03)
        let zone: Tz = "America/Santiago".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        assert_eq!(
            start_of_day_in(zone, date),
            Utc.with_ymd_and_hms(2025, 9, 7, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_format_in_zone_fallback_to_utc() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap();
        assert_eq!(format_in_zone(instant, "Bad/Zone", true), "14:30");
    }

    #[test]
    fn test_format_in_zone_converts() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap();
        // London is on GMT in March before the switch (Mar 10 2025)
        assert_eq!(format_in_zone(instant, "Europe/London", true), "14:30");
        assert_eq!(format_in_zone(instant, "Asia/Tokyo", true), "23:30");
    }

    #[test]
    fn test_next_full_hour() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 25, 31).unwrap();
        assert_eq!(
            next_full_hour(now),
            Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_full_hour_on_the_hour() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        assert_eq!(
            next_full_hour(now),
            Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()
        );
    }
}
