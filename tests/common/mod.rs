//! Shared stubs for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;

use chat_responder::channels::{MessageStream, OutboundPayload, SenderId, Transport};
use chat_responder::error::ChannelError;
use chat_responder::pipeline::{LeadNotifier, LeadRecord, SemanticResolver};

/// Maximum time any test is allowed to run before we consider it hung.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A sender that passes the default filter.
pub const CONTACT: &str = "243812345678@c.us";

/// Start an Axum server on a random port, return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

/// Transport that records every send instead of talking to a bridge.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(SenderId, OutboundPayload)>>,
    fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every send fails with `SendFailed`.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_sends: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<(SenderId, OutboundPayload)> {
        self.sent.lock().unwrap().clone()
    }

    /// Labels of sent payloads, e.g. `["media:poster.jpg", "text"]`.
    pub fn sent_labels(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|(_, payload)| match payload {
                OutboundPayload::Text(_) => "text".to_string(),
                OutboundPayload::Media(media) => format!("media:{}", media.file_name()),
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find_map(|(_, payload)| match payload {
                OutboundPayload::Text(text) => Some(text),
                OutboundPayload::Media(_) => None,
            })
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        Ok(Box::pin(futures::stream::empty()))
    }

    async fn send(&self, recipient: &SenderId, payload: OutboundPayload) -> Result<(), ChannelError> {
        if self.fail_sends {
            return Err(ChannelError::SendFailed {
                name: "recording".into(),
                reason: "bridge offline".into(),
            });
        }
        self.sent.lock().unwrap().push((recipient.clone(), payload));
        Ok(())
    }
}

/// Resolver returning a fixed answer and counting calls.
pub struct StubResolver {
    answer: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl StubResolver {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn silent() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SemanticResolver for StubResolver {
    async fn resolve(&self, query: &str) -> Option<String> {
        self.calls.lock().unwrap().push(query.to_string());
        self.answer.clone()
    }
}

/// Notifier that keeps every record it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    records: Mutex<Vec<LeadRecord>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<LeadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadNotifier for RecordingNotifier {
    async fn notify(&self, record: &LeadRecord) -> Result<(), chat_responder::error::NotifyError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Poll `check` until it holds or the deadline passes.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
