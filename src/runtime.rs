//! Process plumbing shared by the binaries: tracing setup and shutdown.

use std::path::Path;

use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter from `RUST_LOG`, then `LOG_LEVEL`, then `info`.
fn env_filter() -> EnvFilter {
    filter_from(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        std::env::var("LOG_LEVEL").ok(),
    )
}

/// First non-blank, parseable directive set wins.
fn filter_from(rust_log: Option<String>, log_level: Option<String>) -> EnvFilter {
    [rust_log, log_level]
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .find_map(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber: stderr, plus a daily rolling file when
/// `log_dir` is set. Keep the returned guard alive to flush the file writer.
pub fn init_tracing(file_prefix: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{file_prefix}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr)
                .init();
            None
        }
    }
}

/// Wait for SIGINT (ctrl-c) or SIGTERM, then return.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .unwrap_or_else(|e| error!(error = %e, "ctrl-c handler failed"));
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable, relying on ctrl-c");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down gracefully"),
        () = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
