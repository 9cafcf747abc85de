//! Client event kinds

use std::fmt;

/// Discriminator used to subscribe to a subset of client events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Handshake completed, heartbeats started
    Connected,
    /// Connection ended
    Closed,
    /// Every inbound message, before any handling
    RawData,
    /// Inbound message that is not binary-framed
    UnknownResponse,
    /// Binary message that could not be decoded
    DecodingFailed,
    /// Decoded message fetch result
    FetchResult,
    /// Decoded room-enter response
    RoomEntered,
}

impl EventKind {
    /// Get the string representation of the event kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Closed => "closed",
            Self::RawData => "raw_data",
            Self::UnknownResponse => "unknown_response",
            Self::DecodingFailed => "decoding_failed",
            Self::FetchResult => "fetch_result",
            Self::RoomEntered => "room_entered",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
