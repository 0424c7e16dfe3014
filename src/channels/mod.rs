//! Messaging transport abstraction.

pub mod bridge;
pub mod transport;
pub mod types;

pub use bridge::BridgeTransport;
pub use transport::{MessageStream, Transport};
pub use types::{InboundMessage, MediaRef, OutboundPayload, SenderId};
