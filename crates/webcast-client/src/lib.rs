//! # webcast-client
//!
//! Persistent push-frame client: keeps one duplex connection alive with heartbeats,
//! decodes inbound frames, acknowledges the ones that ask for it, and can switch
//! rooms without reconnecting.

pub mod connection;
pub mod credentials;
pub mod error;
pub mod events;
pub mod frames;
pub mod handlers;
pub mod heartbeat;
pub mod transport;

pub use connection::{
    ClientSettings, ConnectOptions, ConnectRequest, ConnectionState, PushClient,
    PushClientBuilder, DEFAULT_FIXED_QUERY, DEFAULT_ORIGIN,
};
pub use credentials::{CookieJar, CredentialStore};
pub use error::{ClientError, ClientResult};
pub use events::{ClientEvent, EventBus, EventKind, Subscription};
pub use frames::FrameBuilder;
pub use handlers::FrameDispatcher;
pub use heartbeat::HeartbeatScheduler;
pub use transport::{
    CloseInfo, InboundMessage, OutboundMessage, OutboundSender, Transport, TransportError,
    TransportEvent, TransportLink, WebSocketTransport,
};
