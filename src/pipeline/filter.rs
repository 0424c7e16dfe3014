//! Sender eligibility — which conversations the responder answers at all.
//!
//! Rejects, in order:
//! - group, broadcast, status, channel and newsletter addresses
//! - addresses containing a denylisted entry
//! - anything not shaped like an individual contact

use regex::Regex;
use tracing::debug;

use crate::channels::SenderId;
use crate::config::FilterConfig;

/// Substrings marking non-individual conversations.
const EXCLUDED_MARKERS: &[&str] = &[
    "@g.us",
    "group",
    "broadcast",
    "status",
    "channel",
    "newsletter",
];

/// Pure eligibility predicate over sender addresses.
#[derive(Debug, Clone)]
pub struct SenderFilter {
    denylist: Vec<String>,
    address_pattern: Regex,
}

impl SenderFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            denylist: config.denylist.clone(),
            address_pattern: config.address_pattern.clone(),
        }
    }

    /// Whether a message from `sender` should be processed.
    pub fn is_eligible(&self, sender: &SenderId) -> bool {
        let address = sender.as_str();

        if let Some(marker) = EXCLUDED_MARKERS.iter().copied().find(|m| address.contains(m)) {
            debug!(sender = %sender, marker, "Sender is not an individual contact");
            return false;
        }

        if self.denylist.iter().any(|d| address.contains(d.as_str())) {
            debug!(sender = %sender, "Sender is denylisted");
            return false;
        }

        if !self.address_pattern.is_match(address) {
            debug!(sender = %sender, "Sender address has unexpected format");
            return false;
        }

        true
    }
}

impl Default for SenderFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
