//! Client error types

use crate::connection::ConnectionState;
use thiserror::Error;
use webcast_core::CodecError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// A session is already open or opening
    #[error("Connection already active (state: {0:?})")]
    AlreadyActive(ConnectionState),

    /// The connect request could not be built
    #[error("Invalid connect request: {0}")]
    InvalidRequest(String),

    /// A required builder component was not set
    #[error("Missing component: {0}")]
    MissingComponent(&'static str),

    /// Frame could not be encoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;
