//! Shared plumbing for the `publish` and `subscribe` broker test clients.
//!
//! The MQTT protocol itself is handled by `rumqttc`; this crate only wires its
//! event loop to the two driver loops and formats what the operator sees.

pub mod endpoint;
pub mod link;
pub mod logging;
pub mod notice;
pub mod publisher;
pub mod subscriber;

pub use link::{spawn_pump, Link};
pub use notice::Notice;

#[cfg(test)]
mod fake;
