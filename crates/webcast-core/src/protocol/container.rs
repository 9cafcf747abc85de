//! Decoded inbound frames

use super::{PayloadType, ProtoMessageFetchResult, PushFrame};

/// Result of decoding one binary push frame
///
/// `frame.payload` holds the decompressed payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedContainer {
    /// The decoded envelope
    pub frame: PushFrame,
    /// Present when the frame carried a message fetch result
    pub fetch_result: Option<ProtoMessageFetchResult>,
}

impl DecodedContainer {
    /// Create a container without a fetch result
    #[must_use]
    pub fn new(frame: PushFrame) -> Self {
        Self {
            frame,
            fetch_result: None,
        }
    }

    /// Attach a fetch result
    #[must_use]
    pub fn with_fetch_result(mut self, result: ProtoMessageFetchResult) -> Self {
        self.fetch_result = Some(result);
        self
    }

    /// Correlation id of the originating frame, if usable
    #[must_use]
    pub fn log_id(&self) -> Option<u64> {
        self.frame.correlation_id()
    }

    /// Payload type of the originating frame
    #[must_use]
    pub fn payload_type(&self) -> PayloadType {
        self.frame.kind()
    }

    /// Check if this container answers a room-enter request
    #[must_use]
    pub fn is_enter_room_response(&self) -> bool {
        self.payload_type().is_enter_room_response()
    }

    /// Check if the fetch result asks for an ack
    #[must_use]
    pub fn needs_ack(&self) -> bool {
        self.fetch_result.as_ref().is_some_and(|r| r.needs_ack)
    }
}
