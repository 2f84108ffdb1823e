// Meeting service module
// Database-backed CRUD for meetings, participants and availability

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use ulid::Ulid;

use crate::models::meeting::{AvailabilityRange, Meeting, Participant};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("meeting {0} not found")]
    MeetingNotFound(String),
    #[error("participant {0} not found")]
    ParticipantNotFound(String),
}

/// The persistence seam the availability editor saves through. Kept narrow
/// so the save/reconcile flow can be tested against a mock store.
#[cfg_attr(test, mockall::automock)]
pub trait MeetingStore {
    /// Full-replace semantics: the participant's prior availability is
    /// atomically deleted and replaced by `ranges`
    fn update_availability(
        &self,
        participant_id: &str,
        ranges: &[AvailabilityRange],
    ) -> Result<(), StoreError>;
}

/// Service for managing meetings stored in SQLite.
pub struct MeetingService<'a> {
    conn: &'a Connection,
}

impl<'a> MeetingService<'a> {
    /// Create a new MeetingService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a meeting, optionally seeded with participants built from
    /// (name, timezone) pairs taken from the comparison view
    pub fn create_meeting(
        &self,
        title: &str,
        seed_timezones: &[(String, String)],
    ) -> Result<String, StoreError> {
        let meeting_id = Ulid::new().to_string();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO meetings (id, title) VALUES (?1, ?2)",
            params![meeting_id, title],
        )?;
        for (name, timezone) in seed_timezones {
            tx.execute(
                "INSERT INTO participants (id, meeting_id, name, timezone)
                 VALUES (?1, ?2, ?3, ?4)",
                params![Ulid::new().to_string(), meeting_id, name, timezone],
            )?;
        }

        tx.commit()?;
        log::info!("Created meeting {meeting_id} with {} seed participants", seed_timezones.len());
        Ok(meeting_id)
    }

    /// Load a meeting with its full roster and availability.
    /// Ok(None) when the meeting does not exist.
    pub fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, StoreError> {
        let title: Option<String> = self
            .conn
            .query_row(
                "SELECT title FROM meetings WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(title) = title else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, name, timezone FROM participants WHERE meeting_id = ?1 ORDER BY rowid",
        )?;
        let mut participants: Vec<Participant> = stmt
            .query_map(params![id], |row| {
                Ok(Participant {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    timezone: row.get(2)?,
                    availability: Vec::new(),
                })
            })?
            .collect::<Result<_, _>>()?;

        for participant in &mut participants {
            participant.availability = self.load_availability(&participant.id)?;
        }

        Ok(Some(Meeting {
            id: id.to_string(),
            title,
            participants,
        }))
    }

    pub fn update_meeting_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE meetings SET title = ?1 WHERE id = ?2",
            params![title, id],
        )?;
        if changed == 0 {
            return Err(StoreError::MeetingNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Add a participant to a meeting
    pub fn join_meeting(
        &self,
        meeting_id: &str,
        name: &str,
        timezone: &str,
    ) -> Result<Participant, StoreError> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM meetings WHERE id = ?1",
                params![meeting_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::MeetingNotFound(meeting_id.to_string()));
        }

        let participant = Participant::new(Ulid::new().to_string(), name, timezone);
        self.conn.execute(
            "INSERT INTO participants (id, meeting_id, name, timezone)
             VALUES (?1, ?2, ?3, ?4)",
            params![participant.id, meeting_id, participant.name, participant.timezone],
        )?;
        Ok(participant)
    }

    pub fn update_participant_timezone(
        &self,
        participant_id: &str,
        timezone: &str,
    ) -> Result<Participant, StoreError> {
        let changed = self.conn.execute(
            "UPDATE participants SET timezone = ?1 WHERE id = ?2",
            params![timezone, participant_id],
        )?;
        if changed == 0 {
            return Err(StoreError::ParticipantNotFound(participant_id.to_string()));
        }
        self.load_participant(participant_id)
    }

    pub fn update_participant_name(
        &self,
        participant_id: &str,
        name: &str,
    ) -> Result<Participant, StoreError> {
        let changed = self.conn.execute(
            "UPDATE participants SET name = ?1 WHERE id = ?2",
            params![name, participant_id],
        )?;
        if changed == 0 {
            return Err(StoreError::ParticipantNotFound(participant_id.to_string()));
        }
        self.load_participant(participant_id)
    }

    fn load_participant(&self, participant_id: &str) -> Result<Participant, StoreError> {
        let mut participant = self
            .conn
            .query_row(
                "SELECT id, name, timezone FROM participants WHERE id = ?1",
                params![participant_id],
                |row| {
                    Ok(Participant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        timezone: row.get(2)?,
                        availability: Vec::new(),
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StoreError::ParticipantNotFound(participant_id.to_string()))?;
        participant.availability = self.load_availability(participant_id)?;
        Ok(participant)
    }

    fn load_availability(
        &self,
        participant_id: &str,
    ) -> Result<Vec<AvailabilityRange>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT start_time, end_time FROM availability
             WHERE participant_id = ?1 ORDER BY start_time",
        )?;
        let ranges = stmt
            .query_map(params![participant_id], |row| {
                let start_time: DateTime<Utc> = row.get(0)?;
                let end_time: DateTime<Utc> = row.get(1)?;
                Ok(AvailabilityRange {
                    start_time,
                    end_time,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(ranges)
    }
}

impl MeetingStore for MeetingService<'_> {
    /// Replace a participant's availability in one transaction: no reader
    /// ever observes the empty-then-partial intermediate state
    fn update_availability(
        &self,
        participant_id: &str,
        ranges: &[AvailabilityRange],
    ) -> Result<(), StoreError> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM participants WHERE id = ?1",
                params![participant_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::ParticipantNotFound(participant_id.to_string()));
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM availability WHERE participant_id = ?1",
            params![participant_id],
        )?;
        for range in ranges {
            tx.execute(
                "INSERT INTO availability (participant_id, start_time, end_time)
                 VALUES (?1, ?2, ?3)",
                params![participant_id, range.start_time, range.end_time],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_create_and_get_meeting() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Team Sync", &[]).unwrap();
        let meeting = service.get_meeting(&id).unwrap().unwrap();

        assert_eq!(meeting.id, id);
        assert_eq!(meeting.title, "Team Sync");
        assert!(meeting.participants.is_empty());
    }

    #[test]
    fn test_create_meeting_with_seed_participants() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let seeds = vec![
            ("Sydney".to_string(), "Australia/Sydney".to_string()),
            ("London".to_string(), "Europe/London".to_string()),
        ];
        let id = service.create_meeting("Kickoff", &seeds).unwrap();

        let meeting = service.get_meeting(&id).unwrap().unwrap();
        assert_eq!(meeting.participants.len(), 2);
        assert_eq!(meeting.participants[0].name, "Sydney");
        assert_eq!(meeting.participants[1].timezone, "Europe/London");
    }

    #[test]
    fn test_get_nonexistent_meeting() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());
        assert!(service.get_meeting("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_meeting_title() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Old Title", &[]).unwrap();
        service.update_meeting_title(&id, "New Title").unwrap();

        let meeting = service.get_meeting(&id).unwrap().unwrap();
        assert_eq!(meeting.title, "New Title");
    }

    #[test]
    fn test_update_title_nonexistent_meeting() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());
        let result = service.update_meeting_title("missing", "Title");
        assert!(matches!(result, Err(StoreError::MeetingNotFound(_))));
    }

    #[test]
    fn test_join_meeting() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Sync", &[]).unwrap();
        let participant = service
            .join_meeting(&id, "Alice", "Europe/Berlin")
            .unwrap();

        assert_eq!(participant.name, "Alice");
        assert!(participant.availability.is_empty());

        let meeting = service.get_meeting(&id).unwrap().unwrap();
        assert_eq!(meeting.participants.len(), 1);
        assert_eq!(meeting.participants[0].id, participant.id);
    }

    #[test]
    fn test_join_nonexistent_meeting() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());
        let result = service.join_meeting("missing", "Alice", "UTC");
        assert!(matches!(result, Err(StoreError::MeetingNotFound(_))));
    }

    #[test]
    fn test_update_availability_full_replace() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Sync", &[]).unwrap();
        let participant = service.join_meeting(&id, "Alice", "UTC").unwrap();

        let first = vec![AvailabilityRange::new(utc(9, 0), utc(10, 0)).unwrap()];
        service.update_availability(&participant.id, &first).unwrap();

        let second = vec![
            AvailabilityRange::new(utc(14, 0), utc(15, 0)).unwrap(),
            AvailabilityRange::new(utc(16, 0), utc(16, 30)).unwrap(),
        ];
        service.update_availability(&participant.id, &second).unwrap();

        let meeting = service.get_meeting(&id).unwrap().unwrap();
        // Prior ranges replaced wholesale, not merged
        assert_eq!(meeting.participants[0].availability, second);
    }

    #[test]
    fn test_update_availability_to_empty() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Sync", &[]).unwrap();
        let participant = service.join_meeting(&id, "Alice", "UTC").unwrap();

        let ranges = vec![AvailabilityRange::new(utc(9, 0), utc(10, 0)).unwrap()];
        service.update_availability(&participant.id, &ranges).unwrap();
        service.update_availability(&participant.id, &[]).unwrap();

        let meeting = service.get_meeting(&id).unwrap().unwrap();
        assert!(meeting.participants[0].availability.is_empty());
    }

    #[test]
    fn test_update_availability_unknown_participant() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());
        let result = service.update_availability("missing", &[]);
        assert!(matches!(result, Err(StoreError::ParticipantNotFound(_))));
    }

    #[test]
    fn test_update_participant_timezone() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Sync", &[]).unwrap();
        let participant = service.join_meeting(&id, "Alice", "UTC").unwrap();

        let updated = service
            .update_participant_timezone(&participant.id, "Asia/Tokyo")
            .unwrap();
        assert_eq!(updated.timezone, "Asia/Tokyo");
        assert_eq!(updated.id, participant.id);
    }

    #[test]
    fn test_update_participant_name() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Sync", &[]).unwrap();
        let participant = service.join_meeting(&id, "Alice", "UTC").unwrap();

        let updated = service
            .update_participant_name(&participant.id, "Alicia")
            .unwrap();
        assert_eq!(updated.name, "Alicia");
    }

    #[test]
    fn test_availability_round_trips_through_storage() {
        let db = setup_test_db();
        let service = MeetingService::new(db.connection());

        let id = service.create_meeting("Sync", &[]).unwrap();
        let participant = service.join_meeting(&id, "Alice", "UTC").unwrap();

        let ranges = vec![AvailabilityRange::new(utc(9, 0), utc(11, 0)).unwrap()];
        service.update_availability(&participant.id, &ranges).unwrap();

        let stored = service.get_meeting(&id).unwrap().unwrap();
        assert_eq!(stored.participants[0].availability, ranges);
    }
}
