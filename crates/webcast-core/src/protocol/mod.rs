//! Push-frame protocol definitions
//!
//! Defines the wire envelope, payload type discriminators, typed sub-payloads,
//! and WebSocket close codes.

mod close_codes;
mod container;
mod frame;
mod payload_type;
mod payloads;

pub use close_codes::CloseCode;
pub use container::DecodedContainer;
pub use frame::PushFrame;
pub use payload_type::PayloadType;
pub use payloads::{
    BaseProtoMessage, HeartbeatMessage, ImEnterRoomMessage, ProtoMessageFetchResult,
};
