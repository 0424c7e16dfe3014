//! Per-sender single-flight guard.
//!
//! At most one pipeline runs per sender. A second message arriving while the
//! first is in flight is dropped by the caller, never queued. The registry is
//! in-memory only; a restart clears every entry.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::channels::SenderId;

/// Senders with a pipeline in flight.
#[derive(Debug, Default)]
pub struct ProcessingRegistry {
    in_flight: Mutex<HashSet<SenderId>>,
}

impl ProcessingRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn entries(&self) -> MutexGuard<'_, HashSet<SenderId>> {
        // The set stays consistent even if a holder panicked mid-section.
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `sender` in flight. Returns false, changing nothing, if it already is.
    pub fn acquire(&self, sender: &SenderId) -> bool {
        self.entries().insert(sender.clone())
    }

    /// Clear the in-flight mark for `sender`.
    pub fn release(&self, sender: &SenderId) {
        self.entries().remove(sender);
    }

    pub fn is_in_flight(&self, sender: &SenderId) -> bool {
        self.entries().contains(sender)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Acquire a scoped lease; the mark is released when the lease drops.
    pub fn try_lease(self: &Arc<Self>, sender: &SenderId) -> Option<SenderLease> {
        self.acquire(sender).then(|| SenderLease {
            registry: Arc::clone(self),
            sender: sender.clone(),
        })
    }
}

/// In-flight mark held for the duration of one pipeline.
#[derive(Debug)]
pub struct SenderLease {
    registry: Arc<ProcessingRegistry>,
    sender: SenderId,
}

impl SenderLease {
    pub fn sender(&self) -> &SenderId {
        &self.sender
    }
}

impl Drop for SenderLease {
    fn drop(&mut self) {
        self.registry.release(&self.sender);
    }
}
