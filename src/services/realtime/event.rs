// Realtime wire events
// Closed tagged union of everything that travels over a meeting channel

use serde::{Deserialize, Serialize};

/// Roster entry carried by a join event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedParticipant {
    pub id: String,
    pub name: String,
    pub timezone: String,
}

/// Everything another client can tell us about a meeting. The wire format
/// is a JSON object discriminated by a `type` field, matching what every
/// client publishes; unknown types fail deserialization rather than being
/// silently accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MeetingEvent {
    /// A participant replaced their availability; `slots` is the full new
    /// slot-key set (RFC 3339 instants), not a delta
    #[serde(rename = "availability_update")]
    AvailabilityUpdate {
        #[serde(rename = "participantId")]
        participant_id: String,
        slots: Vec<String>,
    },
    #[serde(rename = "participant_joined")]
    ParticipantJoined { participant: JoinedParticipant },
    #[serde(rename = "timezone_update")]
    TimezoneUpdate {
        #[serde(rename = "participantId")]
        participant_id: String,
        timezone: String,
    },
}
