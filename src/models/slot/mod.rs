// Slot module
// Conversion between availability ranges and discrete 30-minute slot keys

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::models::meeting::AvailabilityRange;

/// Width of one availability slot. Slot boundaries are always multiples of
/// 30 minutes from the UNIX epoch.
pub const SLOT_MINUTES: i64 = 30;

/// Duration of one slot
pub fn slot_duration() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Round an instant down to the nearest 30-minute boundary.
/// Ranges produced by this crate are always aligned; this exists to
/// defensively align externally-sourced ranges.
pub fn floor_to_slot(instant: DateTime<Utc>) -> DateTime<Utc> {
    let extra_minutes = (instant.minute() as i64) % SLOT_MINUTES;
    let extra_seconds = instant.second() as i64;
    let extra_nanos = instant.nanosecond() as i64;
    instant
        - Duration::minutes(extra_minutes)
        - Duration::seconds(extra_seconds)
        - Duration::nanoseconds(extra_nanos)
}

/// The canonical wire form of a slot key (RFC 3339, UTC)
pub fn slot_key(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Parse a wire slot key back to an instant
pub fn parse_slot_key(key: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(key)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Walk a range in 30-minute steps, emitting each step's start instant while
/// it is strictly before the range end. The start is floored first so a
/// misaligned external range still lands on slot boundaries.
pub fn expand_range(range: &AvailabilityRange) -> Vec<DateTime<Utc>> {
    let mut slots = Vec::new();
    let mut current = floor_to_slot(range.start_time);
    while current < range.end_time {
        slots.push(current);
        current += slot_duration();
    }
    slots
}

/// Expand a list of ranges into one ordered slot set
pub fn expand_ranges(ranges: &[AvailabilityRange]) -> BTreeSet<DateTime<Utc>> {
    let mut set = BTreeSet::new();
    for range in ranges {
        set.extend(expand_range(range));
    }
    set
}

/// Merge slot keys (ascending order) back into maximally-merged ranges.
/// A run of keys each 30 minutes after the previous joins one range; a gap
/// closes the current range at `last + 30min` and starts a new one.
pub fn compact_slots<I>(sorted_slots: I) -> Vec<AvailabilityRange>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut ranges = Vec::new();
    let mut iter = sorted_slots.into_iter();

    let Some(first) = iter.next() else {
        return ranges;
    };

    let mut current_start = first;
    let mut current_end = first + slot_duration();

    for slot in iter {
        if slot == current_end {
            current_end = slot + slot_duration();
        } else {
            ranges.push(AvailabilityRange {
                start_time: current_start,
                end_time: current_end,
            });
            current_start = slot;
            current_end = slot + slot_duration();
        }
    }
    ranges.push(AvailabilityRange {
        start_time: current_start,
        end_time: current_end,
    });

    ranges
}

/// Order-insensitive set equality: identical size and identical membership.
/// Decides whether the local working selection and the authoritative
/// availability have converged.
pub fn sets_equal(a: &BTreeSet<DateTime<Utc>>, b: &BTreeSet<DateTime<Utc>>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|item| b.contains(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> AvailabilityRange {
        AvailabilityRange::new(start, end).unwrap()
    }

    #[test]
    fn test_expand_two_hour_range() {
        let slots = expand_range(&range(utc(9, 0), utc(11, 0)));
        assert_eq!(slots, vec![utc(9, 0), utc(9, 30), utc(10, 0), utc(10, 30)]);
    }

    #[test]
    fn test_expand_single_slot() {
        let slots = expand_range(&range(utc(9, 0), utc(9, 30)));
        assert_eq!(slots, vec![utc(9, 0)]);
    }

    #[test]
    fn test_expand_floors_misaligned_start() {
        let slots = expand_range(&range(utc(9, 17), utc(10, 0)));
        assert_eq!(slots, vec![utc(9, 0), utc(9, 30)]);
    }

    #[test]
    fn test_floor_to_slot_boundaries() {
        assert_eq!(floor_to_slot(utc(9, 0)), utc(9, 0));
        assert_eq!(floor_to_slot(utc(9, 29)), utc(9, 0));
        assert_eq!(floor_to_slot(utc(9, 30)), utc(9, 30));
        assert_eq!(floor_to_slot(utc(9, 59)), utc(9, 30));
    }

    #[test]
    fn test_compact_empty() {
        assert!(compact_slots(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_compact_contiguous_run() {
        let ranges = compact_slots(vec![utc(9, 0), utc(9, 30), utc(10, 0)]);
        assert_eq!(ranges, vec![range(utc(9, 0), utc(10, 30))]);
    }

    #[test]
    fn test_compact_splits_on_gap() {
        let ranges = compact_slots(vec![utc(9, 0), utc(9, 30), utc(11, 0)]);
        assert_eq!(
            ranges,
            vec![range(utc(9, 0), utc(10, 0)), range(utc(11, 0), utc(11, 30))]
        );
    }

    #[test]
    fn test_compact_merges_adjacent_maximally() {
        // No two output ranges may share a boundary
        let ranges = compact_slots(vec![utc(9, 0), utc(9, 30), utc(10, 0), utc(10, 30)]);
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_round_trip_preserves_ranges() {
        let original = vec![range(utc(9, 0), utc(11, 0)), range(utc(14, 0), utc(15, 30))];
        let expanded = expand_ranges(&original);
        let compacted = compact_slots(expanded);
        assert_eq!(compacted, original);
    }

    #[test]
    fn test_sets_equal_order_insensitive() {
        let a: BTreeSet<_> = vec![utc(9, 0), utc(10, 0)].into_iter().collect();
        let b: BTreeSet<_> = vec![utc(10, 0), utc(9, 0)].into_iter().collect();
        assert!(sets_equal(&a, &b));
        assert!(sets_equal(&a, &a));
    }

    #[test]
    fn test_sets_equal_size_mismatch() {
        let a: BTreeSet<_> = vec![utc(9, 0), utc(10, 0)].into_iter().collect();
        let b: BTreeSet<_> = vec![utc(9, 0)].into_iter().collect();
        assert!(!sets_equal(&a, &b));
        assert!(!sets_equal(&b, &a));
    }

    #[test]
    fn test_sets_equal_same_size_different_members() {
        let a: BTreeSet<_> = vec![utc(9, 0)].into_iter().collect();
        let b: BTreeSet<_> = vec![utc(9, 30)].into_iter().collect();
        assert!(!sets_equal(&a, &b));
    }

    #[test]
    fn test_slot_key_round_trip() {
        let instant = utc(9, 30);
        let key = slot_key(instant);
        assert_eq!(parse_slot_key(&key), Some(instant));
    }

    #[test]
    fn test_parse_slot_key_rejects_garbage() {
        assert!(parse_slot_key("not-a-time").is_none());
    }
}
