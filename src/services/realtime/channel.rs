// Realtime channel abstraction
// Publish/subscribe transport seam with presence, plus the per-meeting
// wrapper that silently skips operations while disconnected

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::event::MeetingEvent;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel transport error: {0}")]
    Transport(String),
}

/// A member currently present on a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMember {
    pub client_id: String,
    pub participant_id: Option<String>,
    pub name: Option<String>,
}

/// The hosted pub/sub transport, reduced to what the meeting view uses.
/// Implementations wrap the actual realtime client.
pub trait RealtimeChannel {
    fn is_connected(&self) -> bool;
    fn publish(&self, event: &MeetingEvent) -> Result<(), ChannelError>;
    fn presence_enter(&self, member: PresenceMember) -> Result<(), ChannelError>;
    fn presence_leave(&self, client_id: &str) -> Result<(), ChannelError>;
    fn presence_members(&self) -> Result<Vec<PresenceMember>, ChannelError>;
}

/// One meeting's channel. Operations attempted before the underlying
/// connection is established are no-ops rather than errors; the UI shows a
/// connectivity indicator instead of queueing messages.
pub struct MeetingChannel<C> {
    name: String,
    inner: C,
}

impl<C: RealtimeChannel> MeetingChannel<C> {
    pub fn new(meeting_id: &str, inner: C) -> Self {
        Self {
            name: super::channel_name(meeting_id),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// Publish, or silently skip while disconnected
    pub fn publish(&self, event: &MeetingEvent) -> Result<(), ChannelError> {
        if !self.inner.is_connected() {
            log::debug!("Skipping publish on {}: not connected", self.name);
            return Ok(());
        }
        self.inner.publish(event)
    }

    pub fn presence_enter(&self, member: PresenceMember) -> Result<(), ChannelError> {
        if !self.inner.is_connected() {
            log::debug!("Skipping presence enter on {}: not connected", self.name);
            return Ok(());
        }
        self.inner.presence_enter(member)
    }

    pub fn presence_leave(&self, client_id: &str) -> Result<(), ChannelError> {
        if !self.inner.is_connected() {
            return Ok(());
        }
        self.inner.presence_leave(client_id)
    }

    pub fn presence_members(&self) -> Result<Vec<PresenceMember>, ChannelError> {
        if !self.inner.is_connected() {
            return Ok(Vec::new());
        }
        self.inner.presence_members()
    }
}

/// Loopback transport: records published events and tracks presence in
/// memory. Backs tests and offline development.
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    connected: Mutex<bool>,
    published: Mutex<Vec<MeetingEvent>>,
    present: Mutex<Vec<PresenceMember>>,
}

/// A poisoned lock only means some holder panicked; the guarded state is
/// still valid, so recover it instead of propagating the panic
fn recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryChannel {
    pub fn connected() -> Self {
        let channel = Self::default();
        channel.set_connected(true);
        channel
    }

    pub fn set_connected(&self, connected: bool) {
        *recover(&self.connected) = connected;
    }

    /// Everything published so far, in order
    pub fn published(&self) -> Vec<MeetingEvent> {
        recover(&self.published).clone()
    }
}

impl RealtimeChannel for InMemoryChannel {
    fn is_connected(&self) -> bool {
        *recover(&self.connected)
    }

    fn publish(&self, event: &MeetingEvent) -> Result<(), ChannelError> {
        recover(&self.published).push(event.clone());
        Ok(())
    }

    fn presence_enter(&self, member: PresenceMember) -> Result<(), ChannelError> {
        let mut present = recover(&self.present);
        present.retain(|m| m.client_id != member.client_id);
        present.push(member);
        Ok(())
    }

    fn presence_leave(&self, client_id: &str) -> Result<(), ChannelError> {
        recover(&self.present).retain(|m| m.client_id != client_id);
        Ok(())
    }

    fn presence_members(&self) -> Result<Vec<PresenceMember>, ChannelError> {
        Ok(recover(&self.present).clone())
    }
}
