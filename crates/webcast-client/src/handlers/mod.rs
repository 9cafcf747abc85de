//! Inbound frame handling
//!
//! Classifies every inbound transport message and routes the decoded result to
//! ack emission and the event bus.

use crate::error::ClientResult;
use crate::events::{ClientEvent, EventBus};
use crate::transport::InboundMessage;
use std::sync::Arc;
use webcast_core::{Codec, DecodedContainer};

/// Routes inbound messages to acks and events
#[derive(Debug, Clone)]
pub struct FrameDispatcher {
    codec: Arc<dyn Codec>,
    bus: EventBus,
}

impl FrameDispatcher {
    /// Create a dispatcher decoding with `codec` and publishing on `bus`
    pub fn new(codec: Arc<dyn Codec>, bus: EventBus) -> Self {
        Self { codec, bus }
    }

    /// Handle one inbound message
    ///
    /// `send_ack` is invoked for fetch results that ask for an ack, before the
    /// fetch result is published. Decode failures are published and never
    /// affect later messages.
    pub fn dispatch<F>(&self, message: InboundMessage, send_ack: F)
    where
        F: FnOnce(&DecodedContainer) -> ClientResult<bool>,
    {
        self.bus.emit(ClientEvent::RawData(message.clone()));

        let data = match message {
            InboundMessage::Binary(data) => data,
            text @ InboundMessage::Text(_) => {
                tracing::debug!(bytes = text.len(), "Non-binary message received");
                self.bus.emit(ClientEvent::UnknownResponse(text));
                return;
            }
        };

        let container = match self.codec.decode(&data) {
            Ok(container) => container,
            Err(e) => {
                tracing::warn!(error = %e, bytes = data.len(), "Failed to decode push frame");
                self.bus.emit(ClientEvent::DecodingFailed(Arc::new(e)));
                return;
            }
        };

        tracing::trace!(
            payload_type = %container.payload_type(),
            log_id = ?container.log_id(),
            "Push frame decoded"
        );

        if let Some(result) = &container.fetch_result {
            if result.needs_ack {
                match send_ack(&container) {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::debug!(log_id = ?container.log_id(), "Ack not sent");
                    }
                    Err(e) => {
                        tracing::warn!(log_id = ?container.log_id(), error = %e, "Failed to build ack");
                    }
                }
            }
            self.bus.emit(ClientEvent::FetchResult(result.clone()));
        }

        if container.is_enter_room_response() {
            tracing::info!(log_id = ?container.log_id(), "Room enter acknowledged");
            self.bus.emit(ClientEvent::RoomEntered(container));
        }
    }
}
