//! HTTP surface of the knowledge server: `GET /?q=<question>`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use super::index::KnowledgeBase;

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

async fn search(
    State(kb): State<Arc<KnowledgeBase>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params.q.filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "No query parameter provided"})),
        )
            .into_response();
    };

    let result = kb.search(&query);
    debug!(
        score = result.score,
        answered = result.answer.is_some(),
        "Knowledge search"
    );
    Json(result).into_response()
}

/// Build the knowledge routes.
pub fn knowledge_routes(kb: Arc<KnowledgeBase>) -> Router {
    Router::new().route("/", get(search)).with_state(kb)
}
