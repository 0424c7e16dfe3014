//! Lead notifier — forwards each exchange to the automation webhook.
//!
//! Advisory only. The record is posted from a detached task; delivery to
//! the user never waits on it and its failures are logged, not retried.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::LeadWebhookConfig;
use crate::error::NotifyError;

/// One exchange: who wrote, what they wrote, what we answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    pub from: String,
    pub message: String,
    pub response: String,
}

#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, record: &LeadRecord) -> Result<(), NotifyError>;
}

/// Posts records as JSON with a shared-secret header.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<SecretString>,
    auth_header: String,
}

impl WebhookNotifier {
    pub fn new(config: &LeadWebhookConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            auth_header: config.auth_header.clone(),
        }
    }
}

#[async_trait]
impl LeadNotifier for WebhookNotifier {
    async fn notify(&self, record: &LeadRecord) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.url).json(record);
        if let Some(key) = &self.api_key {
            request = request.header(self.auth_header.as_str(), key.expose_secret());
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(())
    }
}

/// Post `record` on a detached task. The handle is only useful to tests.
pub fn spawn_notify(notifier: Arc<dyn LeadNotifier>, record: LeadRecord) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(sender = %record.from, "Forwarding lead to webhook");
        match notifier.notify(&record).await {
            Ok(()) => info!(sender = %record.from, "Lead forwarded"),
            Err(e) => warn!(sender = %record.from, error = %e, "Lead webhook failed"),
        }
    })
}
