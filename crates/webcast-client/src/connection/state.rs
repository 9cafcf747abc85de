//! Connection state

/// Lifecycle state of the push connection
///
/// `Disconnected -> Connecting -> Connected -> Closing -> Disconnected`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No connection; initial and terminal state
    #[default]
    Disconnected,
    /// Handshake requested, waiting for the transport
    Connecting,
    /// Handshake done, heartbeats running
    Connected,
    /// Close requested, waiting for the close event
    Closing,
}

impl ConnectionState {
    /// Check if frames may be sent in this state
    #[must_use]
    pub const fn can_send(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if a session is open or opening
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closing => "closing",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
