//! Delivery sequencing: pacing delay, media in order, then text.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::channels::{OutboundPayload, SenderId, Transport};
use crate::error::ChannelError;
use crate::pipeline::composer::ComposedResponse;

/// Upper bound on the typing indicator; it runs alongside the pacing delay.
pub const TYPING_TIMEOUT: Duration = Duration::from_secs(1);

/// Sends a composed reply with human-like pacing.
///
/// Sends are strictly sequential. The first failure aborts the rest of the
/// reply; nothing is retried.
pub struct DeliverySequencer {
    transport: Arc<dyn Transport>,
    pacing: Duration,
}

impl DeliverySequencer {
    pub fn new(transport: Arc<dyn Transport>, pacing: Duration) -> Self {
        Self { transport, pacing }
    }

    pub async fn deliver(
        &self,
        recipient: &SenderId,
        response: &ComposedResponse,
    ) -> Result<(), ChannelError> {
        let typing = tokio::time::timeout(TYPING_TIMEOUT, self.transport.send_typing(recipient));
        let (typing, ()) = tokio::join!(typing, tokio::time::sleep(self.pacing));
        match typing {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(sender = %recipient, error = %e, "Typing indicator failed"),
            Err(_) => debug!(sender = %recipient, "Typing indicator timed out"),
        }

        for media in &response.media {
            self.transport
                .send(recipient, OutboundPayload::Media(media.clone()))
                .await?;
            debug!(sender = %recipient, file = media.file_name(), "Media sent");
        }

        self.transport
            .send(recipient, OutboundPayload::Text(response.text.clone()))
            .await
    }
}
