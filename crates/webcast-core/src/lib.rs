//! # webcast-core
//!
//! Wire protocol for the live-broadcast push connection: push frames, their typed
//! sub-payloads, the codec that turns them into bytes, and room parameters.
//! This crate performs no I/O.

pub mod codec;
pub mod protocol;
pub mod room;

// Re-export commonly used types at crate root
pub use codec::{Codec, CodecError, CodecResult, OutboundPayload, ProtobufCodec};
pub use protocol::{
    BaseProtoMessage, CloseCode, DecodedContainer, HeartbeatMessage, ImEnterRoomMessage,
    PayloadType, ProtoMessageFetchResult, PushFrame,
};
pub use room::RoomParameters;
