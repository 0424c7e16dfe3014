//! Message processor — runs one inbound message through the pipeline.
//!
//! Flow:
//! 1. Sender filter → ineligible senders are dropped silently
//! 2. Single-flight lease → busy senders are dropped silently
//! 3. Classification, plus a semantic lookup for questions
//! 4. Composition
//! 5. Lead webhook (detached)
//! 6. Paced delivery
//!
//! The lease is released when `process` returns, on every path.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::channels::{InboundMessage, Transport};
use crate::pipeline::classifier::{self, Classification};
use crate::pipeline::composer::{ComposedResponse, ResponseComposer};
use crate::pipeline::delivery::DeliverySequencer;
use crate::pipeline::filter::SenderFilter;
use crate::pipeline::guard::ProcessingRegistry;
use crate::pipeline::notifier::{LeadNotifier, LeadRecord, spawn_notify};
use crate::pipeline::resolver::SemanticResolver;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Group, broadcast, denylisted or malformed sender.
    Ineligible,
    /// A pipeline for this sender was already in flight.
    Busy,
    /// Reply fully delivered.
    Delivered(Classification),
    /// A send failed; the rest of the reply was abandoned.
    Failed(Classification),
}

impl ProcessOutcome {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ineligible => "ineligible",
            Self::Busy => "busy",
            Self::Delivered(_) => "delivered",
            Self::Failed(_) => "failed",
        }
    }
}

/// Collaborators of the pipeline.
pub struct ProcessorDeps {
    pub transport: Arc<dyn Transport>,
    pub resolver: Arc<dyn SemanticResolver>,
    pub notifier: Option<Arc<dyn LeadNotifier>>,
    pub composer: ResponseComposer,
    pub filter: SenderFilter,
    pub registry: Arc<ProcessingRegistry>,
    pub pacing: std::time::Duration,
}

/// Inbound message pipeline. Shared across per-message tasks.
pub struct MessageProcessor {
    filter: SenderFilter,
    registry: Arc<ProcessingRegistry>,
    resolver: Arc<dyn SemanticResolver>,
    composer: ResponseComposer,
    notifier: Option<Arc<dyn LeadNotifier>>,
    sequencer: DeliverySequencer,
}

impl MessageProcessor {
    pub fn new(deps: ProcessorDeps) -> Self {
        Self {
            filter: deps.filter,
            registry: deps.registry,
            resolver: deps.resolver,
            composer: deps.composer,
            notifier: deps.notifier,
            sequencer: DeliverySequencer::new(deps.transport, deps.pacing),
        }
    }

    pub fn registry(&self) -> &Arc<ProcessingRegistry> {
        &self.registry
    }

    /// Process one inbound message end to end.
    pub async fn process(&self, message: &InboundMessage) -> ProcessOutcome {
        if !self.filter.is_eligible(&message.sender) {
            return ProcessOutcome::Ineligible;
        }

        let Some(_lease) = self.registry.try_lease(&message.sender) else {
            debug!(
                id = %message.id,
                sender = %message.sender,
                "Ignored message: sender already being processed"
            );
            return ProcessOutcome::Busy;
        };

        let classification = classifier::classify(&message.text);
        debug!(
            id = %message.id,
            sender = %message.sender,
            class = classification.label(),
            rule = classifier::matched_rule(&message.text),
            "Classified message"
        );

        let response = self.compose(classification, message).await;

        if let Some(notifier) = &self.notifier {
            let record = LeadRecord {
                from: message.sender.to_string(),
                message: message.text.clone(),
                response: response.text.clone(),
            };
            spawn_notify(Arc::clone(notifier), record);
        }

        match self.sequencer.deliver(&message.sender, &response).await {
            Ok(()) => {
                info!(
                    id = %message.id,
                    sender = %message.sender,
                    class = classification.label(),
                    media = response.media.len(),
                    latency_ms = message.age_ms(),
                    preview = %message.text.chars().take(50).collect::<String>(),
                    "Reply delivered"
                );
                ProcessOutcome::Delivered(classification)
            }
            Err(e) => {
                error!(
                    id = %message.id,
                    sender = %message.sender,
                    error = %e,
                    "Failed to deliver reply"
                );
                ProcessOutcome::Failed(classification)
            }
        }
    }

    async fn compose(
        &self,
        classification: Classification,
        message: &InboundMessage,
    ) -> ComposedResponse {
        let salutation = classifier::salutation_for(&message.text);
        let answer = match classification {
            Classification::Question => self.resolver.resolve(&message.text).await,
            _ => None,
        };
        self.composer
            .compose(classification, salutation, answer.as_deref())
    }
}
