//! Error types for the responder.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Messaging transport errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Media {path} could not be read: {reason}")]
    MediaUnavailable { path: String, reason: String },

    #[error("Channel health check failed: {name}: {reason}")]
    HealthCheckFailed { name: String, reason: String },
}

/// Semantic answer lookup errors.
///
/// Never surfaced past the resolver: every variant degrades to "no answer".
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("lookup returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("lookup response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lead webhook errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook rejected the record with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Knowledge base loading errors.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Knowledge file {path} could not be read: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Knowledge file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Knowledge file {path} has no question/answer pairs")]
    Empty { path: String },
}

