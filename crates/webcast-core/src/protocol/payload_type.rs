//! Push-frame payload types
//!
//! The `payload_type` string of a push frame selects how its payload is read.

/// Payload type discriminator
///
/// Known types are named variants; anything else the service sends is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PayloadType {
    /// Liveness signal (client only)
    Heartbeat,
    /// Acknowledgement of a fetch result (client only)
    Ack,
    /// Room-enter request (client only)
    EnterRoom,
    /// Room-enter response (server only)
    EnterRoomResponse,
    /// Message fetch result (server only)
    Msg,
    /// Any other service-defined type
    Other(String),
}

impl PayloadType {
    /// Get the wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heartbeat => "hb",
            Self::Ack => "ack",
            Self::EnterRoom => "im_enter_room",
            Self::EnterRoomResponse => "im_enter_room_resp",
            Self::Msg => "msg",
            Self::Other(other) => other,
        }
    }

    /// Parse a payload type from its wire representation
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s {
            "hb" => Self::Heartbeat,
            "ack" => Self::Ack,
            "im_enter_room" => Self::EnterRoom,
            "im_enter_room_resp" => Self::EnterRoomResponse,
            "msg" => Self::Msg,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if this type carries a message fetch result
    #[must_use]
    pub const fn is_fetch_result(&self) -> bool {
        matches!(self, Self::Msg)
    }

    /// Check if this type answers a room-enter request
    #[must_use]
    pub const fn is_enter_room_response(&self) -> bool {
        matches!(self, Self::EnterRoomResponse)
    }
}

impl std::fmt::Display for PayloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PayloadType {
    fn from(value: &str) -> Self {
        Self::from_str(value)
    }
}
