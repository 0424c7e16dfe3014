//! REST endpoints for externally triggered sends.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::auth::token_matches;
use crate::channels::{OutboundPayload, SenderId, Transport};

/// Shared state for control routes.
#[derive(Clone)]
pub struct GatewayState {
    pub transport: Arc<dyn Transport>,
    /// When `None`, any token (or none) is accepted.
    pub secret: Option<SecretString>,
    /// Appended to recipients given as a bare number.
    pub contact_suffix: String,
}

impl GatewayState {
    fn recipient_for(&self, to: &str) -> SenderId {
        let to = to.trim();
        if to.contains('@') {
            SenderId::new(to)
        } else {
            SenderId::new(format!("{to}{}", self.contact_suffix))
        }
    }

    fn token_accepted(&self, token: Option<&str>) -> bool {
        match &self.secret {
            Some(secret) => token_matches(secret, token.unwrap_or_default()),
            None => true,
        }
    }
}

/// Body of `POST /send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chat-responder"
    }))
}

/// POST /send
///
/// 403 on a bad token (nothing sent), 200 `{success: true}` after one
/// transport send, 500 `{error}` if that send fails.
async fn send_message(
    State(state): State<GatewayState>,
    Json(request): Json<SendRequest>,
) -> Response {
    if !state.token_accepted(request.token.as_deref()) {
        warn!(to = %request.to, "Rejected send request with invalid token");
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({"error": "Forbidden: Invalid token"})),
        )
            .into_response();
    }

    let recipient = state.recipient_for(&request.to);
    let preview: String = request.message.chars().take(50).collect();

    match state
        .transport
        .send(&recipient, OutboundPayload::Text(request.message))
        .await
    {
        Ok(()) => {
            info!(to = %recipient, preview = %preview, "Message sent via API");
            Json(serde_json::json!({"success": true})).into_response()
        }
        Err(e) => {
            error!(to = %recipient, error = %e, "Send via API failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Build the control routes.
pub fn control_routes(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/send", post(send_message))
        .with_state(state)
}
