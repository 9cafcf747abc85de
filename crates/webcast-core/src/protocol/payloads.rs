//! Typed sub-payloads
//!
//! Protobuf messages carried inside the `payload` bytes of a push frame.

use prost::Message;
use std::collections::HashMap;

/// Liveness payload for `hb` frames
///
/// The room id is encoded as a protobuf `string`. A schema that declares it as
/// an integer needs its own [`Codec`](crate::Codec) with a matching message.
#[derive(Clone, PartialEq, Message)]
pub struct HeartbeatMessage {
    /// Room the connection is observing
    #[prost(string, tag = "1")]
    pub room_id: String,
}

impl HeartbeatMessage {
    /// Create a heartbeat for the given room
    #[must_use]
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
        }
    }
}

/// Room-switch payload for `im_enter_room` frames
///
/// Every identifier, including `room_id`, `live_id` and `account_type`, is a
/// protobuf `string` on the wire. Schemas using integer ids are not wire
/// compatible with this message and need their own [`Codec`](crate::Codec).
#[derive(Clone, PartialEq, Message)]
pub struct ImEnterRoomMessage {
    #[prost(string, tag = "1")]
    pub room_id: String,
    #[prost(string, tag = "2")]
    pub room_tag: String,
    #[prost(string, tag = "3")]
    pub live_region: String,
    #[prost(string, tag = "4")]
    pub live_id: String,
    #[prost(string, tag = "5")]
    pub identity: String,
    #[prost(string, tag = "6")]
    pub cursor: String,
    #[prost(string, tag = "7")]
    pub account_type: String,
    #[prost(string, tag = "8")]
    pub enter_unique_id: String,
    #[prost(string, tag = "9")]
    pub filter_welcome_msg: String,
    #[prost(bool, tag = "10")]
    pub is_anchor_continue_keep_msg: bool,
}

impl ImEnterRoomMessage {
    /// Live id sent with every room-enter request
    pub const LIVE_ID: &'static str = "12";
    /// Identity of a watching client
    pub const AUDIENCE_IDENTITY: &'static str = "audience";
    /// Account type of a watching client
    pub const ACCOUNT_TYPE: &'static str = "0";
    /// Welcome-message filter flag
    pub const FILTER_WELCOME_MSG: &'static str = "0";

    /// Create a room-enter request for a watching client
    ///
    /// The room id is the only variable field.
    #[must_use]
    pub fn audience(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            room_tag: String::new(),
            live_region: String::new(),
            live_id: Self::LIVE_ID.to_string(),
            identity: Self::AUDIENCE_IDENTITY.to_string(),
            cursor: String::new(),
            account_type: Self::ACCOUNT_TYPE.to_string(),
            enter_unique_id: String::new(),
            filter_welcome_msg: Self::FILTER_WELCOME_MSG.to_string(),
            is_anchor_continue_keep_msg: false,
        }
    }
}

/// A single service message inside a fetch result
#[derive(Clone, PartialEq, Message)]
pub struct BaseProtoMessage {
    /// Service message name (e.g. `WebcastChatMessage`)
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(bytes = "vec", tag = "2")]
    pub payload: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub msg_id: i64,
    #[prost(int32, tag = "4")]
    pub msg_type: i32,
    #[prost(int64, tag = "5")]
    pub offset: i64,
    #[prost(bool, tag = "6")]
    pub is_history: bool,
}

/// Payload of `msg` frames
#[derive(Clone, PartialEq, Message)]
pub struct ProtoMessageFetchResult {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<BaseProtoMessage>,
    #[prost(string, tag = "2")]
    pub cursor: String,
    #[prost(uint64, tag = "3")]
    pub fetch_interval: u64,
    #[prost(uint64, tag = "4")]
    pub now: u64,
    /// Opaque string echoed back verbatim as the ack payload
    #[prost(string, tag = "5")]
    pub internal_ext: String,
    #[prost(uint32, tag = "6")]
    pub fetch_type: u32,
    #[prost(map = "string, string", tag = "7")]
    pub route_params: HashMap<String, String>,
    #[prost(uint64, tag = "8")]
    pub heartbeat_duration: u64,
    /// Whether the service expects an ack frame for this result
    #[prost(bool, tag = "9")]
    pub needs_ack: bool,
    #[prost(string, tag = "10")]
    pub push_server: String,
    #[prost(string, tag = "11")]
    pub live_cursor: String,
    #[prost(bool, tag = "12")]
    pub history_no_more: bool,
}
