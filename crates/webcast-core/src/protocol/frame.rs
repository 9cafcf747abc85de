//! Push frame envelope
//!
//! Every message on the connection, in both directions, is one push frame.

use super::PayloadType;
use prost::Message;
use std::collections::HashMap;

/// Wire envelope of the push protocol
#[derive(Clone, PartialEq, Message)]
pub struct PushFrame {
    #[prost(uint64, tag = "1")]
    pub seq_id: u64,

    /// Correlation id for acks
    #[prost(uint64, optional, tag = "2")]
    pub log_id: Option<u64>,

    /// Routing hint, omitted for simple frames
    #[prost(uint64, optional, tag = "3")]
    pub service: Option<u64>,

    /// Routing hint, omitted for simple frames
    #[prost(uint64, optional, tag = "4")]
    pub method: Option<u64>,

    #[prost(map = "string, string", tag = "5")]
    pub headers: HashMap<String, String>,

    #[prost(string, tag = "6")]
    pub payload_encoding: String,

    #[prost(string, tag = "7")]
    pub payload_type: String,

    #[prost(bytes = "vec", tag = "8")]
    pub payload: Vec<u8>,
}

impl PushFrame {
    /// Encoding used for every frame the client sends
    pub const PROTOBUF_ENCODING: &'static str = "pb";

    /// Header announcing payload compression
    pub const COMPRESS_TYPE_HEADER: &'static str = "compress_type";

    /// Compression value for gzip payloads
    pub const GZIP: &'static str = "gzip";

    /// Create a protobuf-encoded frame with empty headers and no routing hints
    #[must_use]
    pub fn new(payload_type: &PayloadType, payload: Vec<u8>) -> Self {
        Self {
            seq_id: 0,
            log_id: None,
            service: None,
            method: None,
            headers: HashMap::new(),
            payload_encoding: Self::PROTOBUF_ENCODING.to_string(),
            payload_type: payload_type.as_str().to_string(),
            payload,
        }
    }

    /// Set the correlation id
    #[must_use]
    pub fn with_log_id(mut self, log_id: u64) -> Self {
        self.log_id = Some(log_id);
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Get the parsed payload type
    #[must_use]
    pub fn kind(&self) -> PayloadType {
        PayloadType::from_str(&self.payload_type)
    }

    /// Get the correlation id usable for an ack
    ///
    /// A zero id is the proto3 default and never correlates anything.
    #[must_use]
    pub fn correlation_id(&self) -> Option<u64> {
        self.log_id.filter(|id| *id != 0)
    }

    /// Check if the payload is gzip-compressed
    #[must_use]
    pub fn is_gzip(&self) -> bool {
        self.headers
            .get(Self::COMPRESS_TYPE_HEADER)
            .is_some_and(|value| value.eq_ignore_ascii_case(Self::GZIP))
    }
}

impl std::fmt::Display for PushFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PushFrame(type={}", self.payload_type)?;
        if let Some(log_id) = self.log_id {
            write!(f, ", log_id={log_id}")?;
        }
        write!(f, ", {} bytes)", self.payload.len())
    }
}
