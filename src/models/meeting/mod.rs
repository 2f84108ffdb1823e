// Meeting module
// Meetings, participants and their availability ranges

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// A contiguous, merged interval of availability in absolute (UTC) time.
///
/// The interval is half-open `[start_time, end_time)`. Ranges belonging to
/// one participant are non-overlapping and maximally merged: two adjacent
/// ranges are always coalesced into one before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRange {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl AvailabilityRange {
    /// Create a new range with validation
    ///
    /// # Examples
    /// ```
    /// use tzmeet::models::meeting::AvailabilityRange;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap();
    /// let range = AvailabilityRange::new(start, end).unwrap();
    /// ```
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self, String> {
        if end_time <= start_time {
            return Err("Range end time must be after start time".to_string());
        }
        Ok(Self {
            start_time,
            end_time,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Half-open containment check: start inclusive, end exclusive
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_time <= instant && instant < self.end_time
    }
}

/// One person in a meeting, identified by an opaque string id.
/// Participants are created on join and never deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub availability: Vec<AvailabilityRange>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            timezone: timezone.into(),
            availability: Vec::new(),
        }
    }

    /// Parse the stored IANA zone name. Returns None for an unknown zone;
    /// callers substitute a UTC fallback rather than failing.
    pub fn zone(&self) -> Option<Tz> {
        self.timezone.parse().ok()
    }

    /// Whether any availability range covers the given instant
    pub fn is_available_at(&self, instant: DateTime<Utc>) -> bool {
        self.availability.iter().any(|r| r.contains(instant))
    }
}

/// A meeting and its roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub participants: Vec<Participant>,
}

impl Meeting {
    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Sorted, de-duplicated timezones across the roster. The viewer's zone
    /// is included even when no participant currently uses it, so the clock
    /// list always shows the viewer's own wall time.
    pub fn unique_timezones(&self, viewer_timezone: Option<&str>) -> Vec<String> {
        let mut zones: Vec<String> = self.participants.iter().map(|p| p.timezone.clone()).collect();
        if let Some(tz) = viewer_timezone {
            zones.push(tz.to_string());
        }
        zones.sort();
        zones.dedup();
        zones
    }

    /// Participants free at the given instant, by name
    pub fn available_at(&self, instant: DateTime<Utc>) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.is_available_at(instant))
            .collect()
    }
}
