//! Frame codec
//!
//! Turns push frames and their sub-payloads into bytes and back.

mod protobuf;

pub use protobuf::ProtobufCodec;

use crate::protocol::{DecodedContainer, HeartbeatMessage, ImEnterRoomMessage, PushFrame};
use thiserror::Error;

/// Sub-payloads the client sends
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    Heartbeat(HeartbeatMessage),
    EnterRoom(ImEnterRoomMessage),
}

/// Codec error type
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed or unrecognized binary data
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Message could not be written
    #[error("Encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Compressed payload could not be inflated
    #[error("Decompress error: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Codec result type
pub type CodecResult<T> = Result<T, CodecError>;

/// Binary encoding of the push protocol
pub trait Codec: Send + Sync {
    /// Encode an outer frame
    fn encode_frame(&self, frame: &PushFrame) -> CodecResult<Vec<u8>>;

    /// Encode a sub-payload destined for a frame's `payload` bytes
    fn encode_payload(&self, payload: &OutboundPayload) -> CodecResult<Vec<u8>>;

    /// Decode an inbound binary message
    fn decode(&self, data: &[u8]) -> CodecResult<DecodedContainer>;
}

impl std::fmt::Debug for dyn Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{Codec}}")
    }
}
