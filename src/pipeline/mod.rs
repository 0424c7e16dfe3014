//! Inbound message processing pipeline.
//!
//! Every inbound message flows through:
//! 1. `SenderFilter::is_eligible()` — individual contacts only
//! 2. `ProcessingRegistry::try_lease()` — one pipeline per sender
//! 3. `classify()` — closed set of intents, no lookups
//! 4. `SemanticResolver::resolve()` — questions only, bounded, fail-open
//! 5. `ResponseComposer::compose()` — templates + ordered media
//! 6. `spawn_notify()` — detached lead webhook
//! 7. `DeliverySequencer::deliver()` — paced, media before text

pub mod classifier;
pub mod composer;
pub mod delivery;
pub mod filter;
pub mod guard;
pub mod notifier;
pub mod processor;
pub mod resolver;
pub mod templates;

pub use classifier::{Classification, Salutation, classify};
pub use composer::{ComposedResponse, MediaCatalog, ResponseComposer};
pub use filter::SenderFilter;
pub use guard::{ProcessingRegistry, SenderLease};
pub use notifier::{LeadNotifier, LeadRecord, WebhookNotifier};
pub use processor::{MessageProcessor, ProcessOutcome, ProcessorDeps};
pub use resolver::{HttpSemanticResolver, SemanticResolver};
