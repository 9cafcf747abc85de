//! Transport abstraction
//!
//! The lifecycle owns a transport through a small capability set: open a connection,
//! send frames and a close request on the outbound channel, and receive connect,
//! message and close events on the inbound channel.

mod websocket;

pub use websocket::WebSocketTransport;

use crate::connection::ConnectRequest;
use thiserror::Error;
use tokio::sync::mpsc;
use webcast_core::CloseCode;

/// A message received from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Binary-framed data, the only kind that is decoded
    Binary(Vec<u8>),
    /// Text data
    Text(String),
}

impl InboundMessage {
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// Size of the message body in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Binary(data) => data.len(),
            Self::Text(text) => text.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A message handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Encoded push frame
    Binary(Vec<u8>),
    /// Request to close the connection with a code
    Close(CloseCode),
}

/// How a connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    /// Close code from the peer, `None` when no close frame was exchanged
    pub code: Option<u16>,
    pub reason: String,
}

impl CloseInfo {
    #[must_use]
    pub fn new(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Normal closure (1000)
    #[must_use]
    pub fn normal() -> Self {
        Self::new(Some(CloseCode::Normal.as_u16()), "")
    }

    /// Connection lost or never established
    #[must_use]
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self::new(None, reason)
    }

    /// Known close code, if any
    #[must_use]
    pub fn close_code(&self) -> Option<CloseCode> {
        self.code.and_then(CloseCode::from_u16)
    }

    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.close_code() == Some(CloseCode::Normal)
    }
}

impl std::fmt::Display for CloseInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.close_code(), self.code) {
            (Some(code), _) => write!(f, "{code}")?,
            (None, Some(raw)) => write!(f, "code {raw}")?,
            (None, None) => write!(f, "no close frame")?,
        }
        if !self.reason.is_empty() {
            write!(f, " - {}", self.reason)?;
        }
        Ok(())
    }
}

/// Event delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed
    Connected,
    /// Data frame received
    Message(InboundMessage),
    /// Connection ended; always the last event
    Closed(CloseInfo),
}

/// Outbound half of an open link
pub type OutboundSender = mpsc::UnboundedSender<OutboundMessage>;

/// Channels for one connection attempt
#[derive(Debug)]
pub struct TransportLink {
    pub outbound: OutboundSender,
    pub events: mpsc::Receiver<TransportEvent>,
}

/// Raw duplex transport
pub trait Transport: Send + Sync {
    /// Start connecting; completion and failure arrive as events on the link
    fn open(&self, request: ConnectRequest) -> TransportLink;
}

impl std::fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{Transport}}")
    }
}

/// Transport error type
#[derive(Debug, Error)]
pub enum TransportError {
    /// Header name or value is not valid HTTP
    #[error("Invalid header {0}: {1}")]
    InvalidHeader(String, String),

    /// WebSocket handshake or I/O failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
