//! Outbound frame construction

mod builder;

pub use builder::FrameBuilder;
