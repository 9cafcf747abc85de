//! Event bus
//!
//! Broadcasts client events to any number of subscribers.

use super::EventKind;
use crate::transport::{CloseInfo, InboundMessage};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use webcast_core::{CodecError, DecodedContainer, ProtoMessageFetchResult};

/// Default number of buffered events per subscriber
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Observable output of the client
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Connection established
    Connected,
    /// Connection closed
    Closed(CloseInfo),
    /// Inbound message, published before any handling
    RawData(InboundMessage),
    /// Inbound message that is not binary-framed
    UnknownResponse(InboundMessage),
    /// Binary message that failed to decode
    DecodingFailed(Arc<CodecError>),
    /// Message fetch result from a decoded frame
    FetchResult(ProtoMessageFetchResult),
    /// Decoded room-enter response
    RoomEntered(DecodedContainer),
}

impl ClientEvent {
    /// Get the kind of this event
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Closed(_) => EventKind::Closed,
            Self::RawData(_) => EventKind::RawData,
            Self::UnknownResponse(_) => EventKind::UnknownResponse,
            Self::DecodingFailed(_) => EventKind::DecodingFailed,
            Self::FetchResult(_) => EventKind::FetchResult,
            Self::RoomEntered(_) => EventKind::RoomEntered,
        }
    }
}

/// Fan-out of client events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to every current subscriber
    pub fn emit(&self, event: ClientEvent) {
        let kind = event.kind();
        // No subscribers is fine
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event = %kind, receivers, "Event emitted");
    }

    /// Subscribe to the listed event kinds
    #[must_use]
    pub fn subscribe(&self, kinds: &[EventKind]) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            kinds: Some(kinds.iter().copied().collect()),
        }
    }

    /// Subscribe to every event
    #[must_use]
    pub fn subscribe_all(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            kinds: None,
        }
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}

/// Receiving end of an event subscription
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ClientEvent>,
    kinds: Option<HashSet<EventKind>>,
}

impl Subscription {
    /// Wait for the next matching event
    ///
    /// Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<ClientEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.accepts(event.kind()) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next matching event if one is already buffered
    pub fn try_recv(&mut self) -> Option<ClientEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.accepts(event.kind()) => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscriber lagged, events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Check if this subscription yields the given kind
    #[must_use]
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}
