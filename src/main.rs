use std::sync::Arc;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use chat_responder::channels::{BridgeTransport, Transport};
use chat_responder::config::ResponderConfig;
use chat_responder::gateway::{GatewayState, control_routes};
use chat_responder::pipeline::{
    HttpSemanticResolver, LeadNotifier, MediaCatalog, MessageProcessor, ProcessingRegistry,
    ProcessorDeps, ResponseComposer, SenderFilter, WebhookNotifier,
};
use chat_responder::runner::Responder;
use chat_responder::runtime::{init_tracing, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ResponderConfig::from_env().context("invalid configuration")?;
    let _log_guard = init_tracing("chat-responder", config.log_dir.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Chat responder starting");

    // ── Media ───────────────────────────────────────────────────────────
    let media = MediaCatalog::in_dir(&config.media_dir);
    for missing in media.missing() {
        warn!(path = %missing.path().display(), "Media file not found, sends will fail");
    }

    // ── Transport ───────────────────────────────────────────────────────
    let bridge = Arc::new(BridgeTransport::new(&config.bridge));
    match bridge.health_check().await {
        Ok(()) => info!(bridge = %config.bridge.url, "WhatsApp bridge reachable"),
        Err(e) => warn!(error = %e, "WhatsApp bridge not reachable yet"),
    }
    let transport: Arc<dyn Transport> = bridge.clone();

    // ── Pipeline ────────────────────────────────────────────────────────
    let notifier = match &config.lead_webhook {
        Some(webhook) => {
            info!("Lead webhook: enabled");
            Some(Arc::new(WebhookNotifier::new(webhook)) as Arc<dyn LeadNotifier>)
        }
        None => {
            info!("Lead webhook: disabled (MAKE_WEBHOOK_URL not set)");
            None
        }
    };

    info!(
        semantic = %config.semantic.base_url(),
        timeout_ms = config.semantic.timeout.as_millis() as u64,
        pacing_ms = config.pacing.as_millis() as u64,
        "Pipeline configured"
    );

    let processor = Arc::new(MessageProcessor::new(ProcessorDeps {
        transport: Arc::clone(&transport),
        resolver: Arc::new(HttpSemanticResolver::new(&config.semantic)),
        notifier,
        composer: ResponseComposer::new(media),
        filter: SenderFilter::new(&config.filter),
        registry: ProcessingRegistry::new(),
        pacing: config.pacing,
    }));

    // ── HTTP server ─────────────────────────────────────────────────────
    if config.gateway.secret.is_none() {
        warn!("WHATSAPP_SECRET not set, POST /send accepts any token");
    }
    let app = control_routes(GatewayState {
        transport: Arc::clone(&transport),
        secret: config.gateway.secret.clone(),
        contact_suffix: config.bridge.contact_suffix.clone(),
    })
    .merge(bridge.router())
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr = config.gateway.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "API listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!(error = %e, "API server error");
        }
    });

    // ── Responder ───────────────────────────────────────────────────────
    Responder::new(transport, processor)
        .run(shutdown_signal())
        .await?;

    if let Err(e) = server.await {
        error!(error = %e, "API server task panicked");
    }

    info!("Chat responder stopped");
    Ok(())
}
