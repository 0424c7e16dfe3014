//! WhatsApp session bridge — HTTP client for sends, webhook for inbound.
//!
//! The WhatsApp Web session (QR login, reconnects) lives in a sidecar
//! process. Outbound payloads are posted to it; it posts every received
//! message to `POST /inbound`, which feeds the stream returned by `start()`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::auth::{bearer_token, token_matches};
use crate::channels::transport::{MessageStream, Transport};
use crate::channels::types::{InboundMessage, MediaRef, OutboundPayload, SenderId};
use crate::config::BridgeConfig;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "whatsapp";

/// Event posted by the bridge for each received message.
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    pub from: String,
    #[serde(default)]
    pub body: String,
}

/// State shared between the transport and the inbound webhook.
struct BridgeInner {
    incoming_tx: mpsc::UnboundedSender<InboundMessage>,
    token: Option<SecretString>,
}

/// Axum handler state (cloneable).
#[derive(Clone)]
struct InboundState {
    inner: Arc<BridgeInner>,
}

/// Transport backed by the WhatsApp session bridge.
pub struct BridgeTransport {
    base_url: String,
    inner: Arc<BridgeInner>,
    client: reqwest::Client,
    /// Receiver side of the inbound channel — consumed once in `start()`.
    incoming_rx: Mutex<Option<mpsc::UnboundedReceiver<InboundMessage>>>,
}

impl BridgeTransport {
    pub fn new(config: &BridgeConfig) -> Self {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        Self {
            base_url: config.url.clone(),
            inner: Arc::new(BridgeInner {
                incoming_tx,
                token: config.token.clone(),
            }),
            client: reqwest::Client::new(),
            incoming_rx: Mutex::new(Some(incoming_rx)),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Build the `POST /inbound` route. Merge with the control router.
    pub fn router(&self) -> Router {
        let state = InboundState {
            inner: Arc::clone(&self.inner),
        };
        Router::new()
            .route("/inbound", post(inbound_handler))
            .with_state(state)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), ChannelError> {
        let resp = self
            .authorized(self.client.post(self.api_url(path)))
            .json(&body)
            .send()
            .await
            .map_err(send_failed)?;
        check_status(resp).await
    }

    async fn send_media(&self, recipient: &SenderId, media: &MediaRef) -> Result<(), ChannelError> {
        let bytes = tokio::fs::read(media.path()).await.map_err(|e| {
            ChannelError::MediaUnavailable {
                path: media.path().display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let part = Part::bytes(bytes).file_name(media.file_name().to_string());
        let form = Form::new()
            .text("chatId", recipient.to_string())
            .part("file", part);

        let resp = self
            .authorized(self.client.post(self.api_url("media")))
            .multipart(form)
            .send()
            .await
            .map_err(send_failed)?;
        check_status(resp).await
    }
}

#[async_trait]
impl Transport for BridgeTransport {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let rx = self
            .incoming_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ChannelError::StartupFailed {
                name: CHANNEL_NAME.into(),
                reason: "start() already called".into(),
            })?;

        info!(bridge = %self.base_url, "WhatsApp bridge listening for messages");

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });
        Ok(Box::pin(stream))
    }

    async fn send(
        &self,
        recipient: &SenderId,
        payload: OutboundPayload,
    ) -> Result<(), ChannelError> {
        match payload {
            OutboundPayload::Text(text) => {
                self.post_json(
                    "messages",
                    serde_json::json!({ "chatId": recipient.as_str(), "text": text }),
                )
                .await
            }
            OutboundPayload::Media(media) => self.send_media(recipient, &media).await,
        }
    }

    async fn send_typing(&self, recipient: &SenderId) -> Result<(), ChannelError> {
        self.post_json("typing", serde_json::json!({ "chatId": recipient.as_str() }))
            .await
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .authorized(self.client.get(self.api_url("health")))
            .send()
            .await
            .map_err(|e| ChannelError::HealthCheckFailed {
                name: CHANNEL_NAME.into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::HealthCheckFailed {
                name: CHANNEL_NAME.into(),
                reason: format!("health returned {}", resp.status()),
            })
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        info!("WhatsApp bridge shutting down");
        Ok(())
    }
}

// ── Inbound webhook ─────────────────────────────────────────────────

async fn inbound_handler(
    State(state): State<InboundState>,
    headers: HeaderMap,
    Json(event): Json<InboundEvent>,
) -> impl IntoResponse {
    if let Some(expected) = &state.inner.token {
        let given = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .unwrap_or_default();
        if !token_matches(expected, given) {
            warn!("Rejected inbound event with invalid bridge token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    debug!(sender = %event.from, "Received message");
    let message = InboundMessage::new(event.from, event.body);
    if state.inner.incoming_tx.send(message).is_err() {
        warn!("Inbound stream closed, dropping event");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::ACCEPTED
}

// ── Helpers ─────────────────────────────────────────────────────────

fn send_failed(e: reqwest::Error) -> ChannelError {
    ChannelError::SendFailed {
        name: CHANNEL_NAME.into(),
        reason: e.to_string(),
    }
}

async fn check_status(resp: reqwest::Response) -> Result<(), ChannelError> {
    if resp.status().is_success() {
        return Ok(());
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ChannelError::SendFailed {
        name: CHANNEL_NAME.into(),
        reason: format!("bridge returned {status}: {body}"),
    })
}
