//! Main loop — drains the transport stream, one task per message.

use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::channels::Transport;
use crate::error::ChannelError;
use crate::pipeline::MessageProcessor;

pub struct Responder {
    transport: Arc<dyn Transport>,
    processor: Arc<MessageProcessor>,
}

impl Responder {
    pub fn new(transport: Arc<dyn Transport>, processor: Arc<MessageProcessor>) -> Self {
        Self {
            transport,
            processor,
        }
    }

    /// Run until the stream ends or `shutdown` resolves.
    ///
    /// Pipelines already in flight are allowed to finish.
    pub async fn run<S>(self, shutdown: S) -> Result<(), ChannelError>
    where
        S: Future<Output = ()> + Send,
    {
        let mut stream = self.transport.start().await?;
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        info!(channel = self.transport.name(), "Responder ready and listening");

        loop {
            let message = tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting messages");
                    break;
                }
                msg = stream.next() => match msg {
                    Some(m) => m,
                    None => {
                        info!("Inbound stream ended");
                        break;
                    }
                },
                Some(_) = tasks.join_next(), if !tasks.is_empty() => continue,
            };

            let processor = Arc::clone(&self.processor);
            tasks.spawn(async move {
                let outcome = processor.process(&message).await;
                debug!(id = %message.id, outcome = outcome.label(), "Message settled");
                outcome
            });
        }

        let in_flight = tasks.len();
        if in_flight > 0 {
            info!(in_flight, "Waiting for in-flight replies");
        }
        while tasks.join_next().await.is_some() {}

        self.transport.shutdown().await
    }
}
