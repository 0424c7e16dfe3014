//! Semantic answer lookup with a hard deadline.
//!
//! Fail-open: timeouts, transport errors, non-2xx statuses and malformed
//! bodies all yield `None`, and the caller falls back to canned content.
//! One attempt per message, no retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SemanticConfig;
use crate::error::LookupError;

/// Source of answers for free-form questions.
#[async_trait]
pub trait SemanticResolver: Send + Sync {
    /// Best answer for `query`, or `None`.
    async fn resolve(&self, query: &str) -> Option<String>;
}

/// `GET <base>?q=<query>` → `{ "answer": string | null }`.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    answer: Option<String>,
}

/// Resolver backed by the HTTP knowledge service.
pub struct HttpSemanticResolver {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSemanticResolver {
    pub fn new(config: &SemanticConfig) -> Self {
        Self::with_base_url(config.base_url(), config.timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    /// One bounded lookup. Dropping the request future on timeout aborts it.
    pub async fn lookup(&self, query: &str) -> Result<Option<String>, LookupError> {
        tokio::time::timeout(self.timeout, self.fetch(query))
            .await
            .map_err(|_| LookupError::Timeout(self.timeout))?
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>, LookupError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = resp.bytes().await?;
        let parsed: LookupResponse = serde_json::from_slice(&body)?;
        Ok(parsed.answer.filter(|a| !a.trim().is_empty()))
    }
}

#[async_trait]
impl SemanticResolver for HttpSemanticResolver {
    async fn resolve(&self, query: &str) -> Option<String> {
        match self.lookup(query).await {
            Ok(Some(answer)) => {
                debug!(answer_len = answer.len(), "Semantic lookup found an answer");
                Some(answer)
            }
            Ok(None) => {
                debug!("Semantic lookup had no answer");
                None
            }
            Err(e) => {
                warn!(error = %e, "Semantic lookup failed, using fallback");
                None
            }
        }
    }
}
