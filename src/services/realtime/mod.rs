// Realtime service module
// Channel abstraction, wire events, and the inbound update bridge for the
// per-meeting pub/sub topic

pub mod auth;
pub mod bridge;
pub mod channel;
pub mod event;

pub use bridge::RemoteUpdateBridge;
pub use channel::{ChannelError, MeetingChannel, RealtimeChannel};
pub use event::MeetingEvent;

/// Topic name for a meeting's realtime channel
pub fn channel_name(meeting_id: &str) -> String {
    format!("meeting:{meeting_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name() {
        assert_eq!(channel_name("abc123"), "meeting:abc123");
    }
}
