//! Shared message types for the messaging transport.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Sender identity ─────────────────────────────────────────────────

/// Address of the other party of a conversation (e.g. `243812345678@c.us`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenderId(String);

impl SenderId {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenderId {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for SenderId {
    fn from(address: String) -> Self {
        Self(address)
    }
}

// ── Inbound message ─────────────────────────────────────────────────

/// A message received from the transport. Never persisted.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Generated correlation id for logs.
    pub id: Uuid,
    pub sender: SenderId,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(sender: impl Into<SenderId>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            text: text.into(),
            received_at: Utc::now(),
        }
    }

    /// Time since the message was received, in milliseconds.
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.received_at).num_milliseconds()
    }
}

// ── Outbound payloads ───────────────────────────────────────────────

/// Handle to a pre-existing media asset on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef(PathBuf);

impl MediaRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name sent alongside the bytes.
    pub fn file_name(&self) -> &str {
        self.0
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("media")
    }
}

/// One unit handed to `Transport::send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPayload {
    Text(String),
    Media(MediaRef),
}
