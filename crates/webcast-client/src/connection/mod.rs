//! Connection lifecycle
//!
//! Owns the single active connection: connect, heartbeat start/stop, inbound
//! dispatch, and graceful close.

mod client;
mod request;
mod session;
mod state;

pub use client::{
    ClientSettings, PushClient, PushClientBuilder, DEFAULT_FIXED_QUERY, DEFAULT_ORIGIN,
};
pub use request::{ConnectOptions, ConnectRequest};
pub use state::ConnectionState;
