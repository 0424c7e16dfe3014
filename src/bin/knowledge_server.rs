//! Knowledge server: answers `GET /?q=<question>` from a local Q/A file.
//!
//! Usage: `knowledge-server [port]`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::info;

use chat_responder::knowledge::{KnowledgeBase, knowledge_routes};
use chat_responder::runtime::{init_tracing, shutdown_signal};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_KNOWLEDGE_FILE: &str = "qa_knowledge.json";

fn port_from(arg: Option<String>) -> anyhow::Result<u16> {
    match arg.or_else(|| std::env::var("KNOWLEDGE_SERVER_PORT").ok()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid port {raw:?}")),
        None => Ok(DEFAULT_PORT),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing("knowledge-server", None);

    let port = port_from(std::env::args().nth(1))?;
    let path = std::env::var("KNOWLEDGE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_KNOWLEDGE_FILE));

    let kb = KnowledgeBase::load(&path)
        .with_context(|| format!("failed to load knowledge from {}", path.display()))?;
    info!(
        path = %path.display(),
        pairs = kb.len(),
        vocabulary = kb.vocabulary_size(),
        "Knowledge base loaded"
    );

    let app = knowledge_routes(Arc::new(kb)).layer(TraceLayer::new_for_http());
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Knowledge server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
