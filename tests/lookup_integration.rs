//! Integration tests for the outbound HTTP collaborators: the semantic
//! resolver and the lead webhook. Each test stands up a stub Axum server.

mod common;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::time::timeout;

use chat_responder::config::LeadWebhookConfig;
use chat_responder::error::{LookupError, NotifyError};
use chat_responder::knowledge::{KnowledgeBase, QaPair, knowledge_routes};
use chat_responder::pipeline::{
    HttpSemanticResolver, LeadNotifier, LeadRecord, SemanticResolver, WebhookNotifier,
};

use common::{TEST_TIMEOUT, serve};

const LOOKUP_TIMEOUT: Duration = Duration::from_millis(300);

async fn resolver_for(app: Router) -> HttpSemanticResolver {
    let base = serve(app).await;
    HttpSemanticResolver::with_base_url(format!("{base}/"), LOOKUP_TIMEOUT)
}

fn fixed(status: StatusCode, body: &'static str) -> Router {
    Router::new().route("/", get(move || async move { (status, body) }))
}

// ── Semantic resolver ────────────────────────────────────────────────

#[tokio::test]
async fn resolver_passes_query_and_returns_answer() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route(
            "/",
            get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
                let q = params.get("q").cloned().unwrap_or_default();
                Json(json!({ "answer": format!("echo: {q}") }))
            }),
        );
        let resolver = resolver_for(app).await;

        let answer = resolver.resolve("Comment créer un compte?").await;
        assert_eq!(answer.as_deref(), Some("echo: Comment créer un compte?"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resolver_null_or_missing_answer_is_none() {
    timeout(TEST_TIMEOUT, async {
        let null = resolver_for(fixed(StatusCode::OK, r#"{"answer": null, "score": 0.01}"#)).await;
        assert_eq!(null.resolve("Tarifs?").await, None);

        let missing = resolver_for(fixed(StatusCode::OK, r#"{"score": 0.5}"#)).await;
        assert_eq!(missing.resolve("Tarifs?").await, None);

        let blank = resolver_for(fixed(StatusCode::OK, r#"{"answer": "  "}"#)).await;
        assert_eq!(blank.resolve("Tarifs?").await, None);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resolver_non_success_status_is_none() {
    timeout(TEST_TIMEOUT, async {
        let resolver =
            resolver_for(fixed(StatusCode::INTERNAL_SERVER_ERROR, r#"{"answer": "nope"}"#)).await;

        assert!(matches!(
            resolver.lookup("Tarifs?").await,
            Err(LookupError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        ));
        assert_eq!(resolver.resolve("Tarifs?").await, None);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resolver_malformed_body_is_none() {
    timeout(TEST_TIMEOUT, async {
        let resolver = resolver_for(fixed(StatusCode::OK, "<html>oops</html>")).await;

        assert!(matches!(
            resolver.lookup("Tarifs?").await,
            Err(LookupError::Parse(_))
        ));
        assert_eq!(resolver.resolve("Tarifs?").await, None);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resolver_gives_up_at_deadline() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "answer": "too late" }))
            }),
        );
        let resolver = resolver_for(app).await;

        let started = Instant::now();
        assert!(matches!(
            resolver.lookup("Tarifs?").await,
            Err(LookupError::Timeout(d)) if d == LOOKUP_TIMEOUT
        ));
        assert!(started.elapsed() < Duration::from_secs(2));

        assert_eq!(resolver.resolve("Tarifs?").await, None);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resolver_unreachable_service_is_none() {
    timeout(TEST_TIMEOUT, async {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let resolver =
            HttpSemanticResolver::with_base_url(format!("http://127.0.0.1:{port}/"), LOOKUP_TIMEOUT);
        assert_eq!(resolver.resolve("Tarifs?").await, None);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resolver_against_knowledge_server() {
    timeout(TEST_TIMEOUT, async {
        let kb = KnowledgeBase::from_pairs(vec![
            QaPair {
                question: "Comment commander un bracelet?".into(),
                answer: "Écrivez-nous sur WhatsApp pour commander.".into(),
            },
            QaPair {
                question: "Quels sont les tarifs?".into(),
                answer: "Le bracelet coûte 25 USD.".into(),
            },
        ]);
        let resolver = resolver_for(knowledge_routes(Arc::new(kb))).await;

        assert_eq!(
            resolver.resolve("quels sont les tarifs").await.as_deref(),
            Some("Le bracelet coûte 25 USD.")
        );
        assert_eq!(resolver.resolve("xyz qqq zzz").await, None);
    })
    .await
    .expect("test timed out");
}

// ── Lead webhook ─────────────────────────────────────────────────────

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Webhook stub capturing the `x-make-apikey` header and the JSON body.
fn webhook_stub(status: StatusCode) -> (Router, Captured) {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route(
            "/hook",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let key = headers
                        .get("x-make-apikey")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    captured.lock().unwrap().push((key, body));
                    (status, "Accepted")
                },
            ),
        )
        .with_state(Arc::clone(&captured));
    (app, captured)
}

fn record() -> LeadRecord {
    LeadRecord {
        from: common::CONTACT.into(),
        message: "Bonjour".into(),
        response: "Bonjour\nJe suis Linky Bot".into(),
    }
}

#[tokio::test]
async fn webhook_posts_record_with_api_key() {
    timeout(TEST_TIMEOUT, async {
        let (app, captured) = webhook_stub(StatusCode::OK);
        let base = serve(app).await;
        let notifier = WebhookNotifier::new(&LeadWebhookConfig {
            url: format!("{base}/hook"),
            api_key: Some(SecretString::from("make-secret")),
            auth_header: "x-make-apikey".into(),
        });

        notifier.notify(&record()).await.unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (key, body) = &captured[0];
        assert_eq!(key.as_deref(), Some("make-secret"));
        assert_eq!(
            body,
            &json!({
                "from": common::CONTACT,
                "message": "Bonjour",
                "response": "Bonjour\nJe suis Linky Bot",
            })
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn webhook_without_key_sends_no_header() {
    timeout(TEST_TIMEOUT, async {
        let (app, captured) = webhook_stub(StatusCode::OK);
        let base = serve(app).await;
        let notifier = WebhookNotifier::new(&LeadWebhookConfig {
            url: format!("{base}/hook"),
            api_key: None,
            auth_header: "x-make-apikey".into(),
        });

        notifier.notify(&record()).await.unwrap();
        assert_eq!(captured.lock().unwrap()[0].0, None);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn webhook_rejection_is_reported() {
    timeout(TEST_TIMEOUT, async {
        let (app, _captured) = webhook_stub(StatusCode::UNAUTHORIZED);
        let base = serve(app).await;
        let notifier = WebhookNotifier::new(&LeadWebhookConfig {
            url: format!("{base}/hook"),
            api_key: Some(SecretString::from("wrong")),
            auth_header: "x-make-apikey".into(),
        });

        match notifier.notify(&record()).await {
            Err(NotifyError::Rejected { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "Accepted");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    })
    .await
    .expect("test timed out");
}
