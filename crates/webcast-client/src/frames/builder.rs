//! Frame builder
//!
//! Turns semantic requests (heartbeat, ack, room switch) into encoded push frames.

use crate::error::ClientResult;
use std::sync::Arc;
use webcast_core::{
    Codec, DecodedContainer, HeartbeatMessage, ImEnterRoomMessage, OutboundPayload, PayloadType,
    PushFrame,
};

/// Builds encoded outbound frames
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    codec: Arc<dyn Codec>,
}

impl FrameBuilder {
    /// Create a builder over the given codec
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Get the codec used for encoding
    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    /// Liveness frame carrying the observed room id
    pub fn heartbeat(&self, room_id: &str) -> ClientResult<Vec<u8>> {
        let payload = OutboundPayload::Heartbeat(HeartbeatMessage::new(room_id));
        self.wrap(&PayloadType::Heartbeat, &payload)
    }

    /// Ack frame for a decoded container
    ///
    /// Returns `None` when the container has no usable log id. The payload is
    /// the raw UTF-8 bytes of the fetch result's `internal_ext`.
    pub fn ack(&self, container: &DecodedContainer) -> ClientResult<Option<Vec<u8>>> {
        let Some(log_id) = container.log_id() else {
            tracing::debug!(
                payload_type = %container.payload_type(),
                "No log id on container, ack skipped"
            );
            return Ok(None);
        };

        let internal_ext = container
            .fetch_result
            .as_ref()
            .map(|result| result.internal_ext.as_bytes().to_vec())
            .unwrap_or_default();

        let frame = PushFrame::new(&PayloadType::Ack, internal_ext).with_log_id(log_id);
        Ok(Some(self.codec.encode_frame(&frame)?))
    }

    /// Room-enter request for a watching client
    pub fn enter_room(&self, room_id: &str) -> ClientResult<Vec<u8>> {
        let payload = OutboundPayload::EnterRoom(ImEnterRoomMessage::audience(room_id));
        self.wrap(&PayloadType::EnterRoom, &payload)
    }

    fn wrap(&self, payload_type: &PayloadType, payload: &OutboundPayload) -> ClientResult<Vec<u8>> {
        let bytes = self.codec.encode_payload(payload)?;
        let frame = PushFrame::new(payload_type, bytes);
        Ok(self.codec.encode_frame(&frame)?)
    }
}
