// Remote update bridge
// Applies inbound channel events to the local roster read-model without
// disturbing the viewer's own in-progress edits

use crate::models::meeting::Participant;
use crate::models::slot::{compact_slots, parse_slot_key};

use super::event::MeetingEvent;

/// Read-model of the other participants, written only by remote events and
/// read-only for the renderer. The viewer's own availability is never
/// routed through here: their optimistic local state is authoritative for
/// itself and reconciles through the normal persistence echo instead.
#[derive(Debug, Clone)]
pub struct RemoteUpdateBridge {
    viewer_id: Option<String>,
    roster: Vec<Participant>,
}

impl RemoteUpdateBridge {
    pub fn new(viewer_id: Option<String>, roster: Vec<Participant>) -> Self {
        Self { viewer_id, roster }
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    /// The viewer identified themselves (joined or switched identity)
    pub fn set_viewer(&mut self, viewer_id: Option<String>) {
        self.viewer_id = viewer_id;
    }

    fn is_viewer(&self, participant_id: &str) -> bool {
        self.viewer_id.as_deref() == Some(participant_id)
    }

    /// Apply one inbound event. Returns true when the read-model changed,
    /// so callers know to re-derive the heatmap.
    pub fn apply(&mut self, event: &MeetingEvent) -> bool {
        match event {
            MeetingEvent::AvailabilityUpdate {
                participant_id,
                slots,
            } => self.apply_availability(participant_id, slots),
            MeetingEvent::ParticipantJoined { participant } => {
                // Idempotent by id: echoes of our own broadcast or
                // duplicate deliveries must not duplicate the roster entry
                if self.roster.iter().any(|p| p.id == participant.id) {
                    return false;
                }
                self.roster.push(Participant::new(
                    participant.id.clone(),
                    participant.name.clone(),
                    participant.timezone.clone(),
                ));
                true
            }
            MeetingEvent::TimezoneUpdate {
                participant_id,
                timezone,
            } => {
                // The viewer is the origin of their own timezone change and
                // already applied it optimistically
                if self.is_viewer(participant_id) {
                    return false;
                }
                match self.roster.iter_mut().find(|p| p.id == *participant_id) {
                    Some(participant) => {
                        participant.timezone = timezone.clone();
                        true
                    }
                    None => {
                        log::warn!("Timezone update for unknown participant {participant_id}");
                        false
                    }
                }
            }
        }
    }

    fn apply_availability(&mut self, participant_id: &str, slot_keys: &[String]) -> bool {
        if self.is_viewer(participant_id) {
            return false;
        }

        let Some(participant) = self.roster.iter_mut().find(|p| p.id == participant_id) else {
            log::warn!("Availability update for unknown participant {participant_id}");
            return false;
        };

        let mut slots: Vec<_> = slot_keys
            .iter()
            .filter_map(|key| {
                let parsed = parse_slot_key(key);
                if parsed.is_none() {
                    log::warn!("Dropping malformed slot key {key:?} from {participant_id}");
                }
                parsed
            })
            .collect();
        slots.sort();
        slots.dedup();

        // Replace entirely: last received update wins, no partial merge
        participant.availability = compact_slots(slots);
        true
    }
}
