//! Protobuf codec

use super::{Codec, CodecError, CodecResult, OutboundPayload};
use crate::protocol::{DecodedContainer, ProtoMessageFetchResult, PushFrame};
use flate2::read::GzDecoder;
use prost::Message;
use std::io::Read;

/// Default codec: prost messages, gzip-aware on decode
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl ProtobufCodec {
    /// Create a new codec
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn inflate(data: &[u8]) -> CodecResult<Vec<u8>> {
        let mut inflated = Vec::with_capacity(data.len() * 2);
        GzDecoder::new(data)
            .read_to_end(&mut inflated)
            .map_err(CodecError::Decompress)?;
        Ok(inflated)
    }
}

impl Codec for ProtobufCodec {
    fn encode_frame(&self, frame: &PushFrame) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(frame.encoded_len());
        frame.encode(&mut buf)?;
        Ok(buf)
    }

    fn encode_payload(&self, payload: &OutboundPayload) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        match payload {
            OutboundPayload::Heartbeat(hb) => hb.encode(&mut buf)?,
            OutboundPayload::EnterRoom(enter) => enter.encode(&mut buf)?,
        }
        Ok(buf)
    }

    fn decode(&self, data: &[u8]) -> CodecResult<DecodedContainer> {
        let mut frame = PushFrame::decode(data)?;

        if frame.is_gzip() {
            frame.payload = Self::inflate(&frame.payload)?;
        }

        if !frame.kind().is_fetch_result() {
            return Ok(DecodedContainer::new(frame));
        }

        let result = ProtoMessageFetchResult::decode(frame.payload.as_slice())?;

        tracing::trace!(
            log_id = ?frame.log_id,
            messages = result.messages.len(),
            needs_ack = result.needs_ack,
            "Decoded fetch result"
        );

        Ok(DecodedContainer::new(frame).with_fetch_result(result))
    }
}
