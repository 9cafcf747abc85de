//! Client events
//!
//! Observable outputs of the connection, fanned out to subscribers by kind.

mod bus;
mod event_types;

pub use bus::{ClientEvent, EventBus, Subscription, DEFAULT_EVENT_BUFFER};
pub use event_types::EventKind;
