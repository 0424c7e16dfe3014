//! Transport trait — the messaging session seen from the responder.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::channels::types::{InboundMessage, OutboundPayload, SenderId};
use crate::error::ChannelError;

/// Stream of inbound messages emitted by a transport.
pub type MessageStream = Pin<Box<dyn Stream<Item = InboundMessage> + Send>>;

/// Messaging session — pure I/O, no business logic.
///
/// Every `send` resolves or fails on its own; callers decide ordering.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name (e.g. "whatsapp").
    fn name(&self) -> &str;

    /// Start receiving. May be called once.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Send one payload to a recipient.
    async fn send(&self, recipient: &SenderId, payload: OutboundPayload)
    -> Result<(), ChannelError>;

    /// Show a typing indicator. Best-effort.
    async fn send_typing(&self, _recipient: &SenderId) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
