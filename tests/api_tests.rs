use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use edumate_client::error::ClientError;
use edumate_client::message::AnswerResponse;
use edumate_client::routes::feature::PresetAnswer;
use edumate_client::{Backend, ChatClient, ChatLog, Config, HttpBackend, Intent, Turn};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

/// Minimal stand-in for the EduMate backend.
async fn spawn_backend() -> (String, Seen) {
    let seen: Seen = Arc::default();

    fn record(path: &str, seen: &Seen, body: Value) {
        seen.lock().unwrap().push((path.to_string(), body));
    }

    let app = Router::new()
        .route(
            "/ask",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                let question = body["question"].as_str().unwrap_or_default().to_string();
                record("/ask", &seen, body);
                Json(json!({ "answer": format!("You asked: {question}") }))
            }),
        )
        .route(
            "/quiz",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                record("/quiz", &seen, body);
                Json(json!({ "answer": "1. What is pH?" }))
            }),
        )
        .route("/countdown", get(|| async { Json(json!({ "answer": "42 days to go" })) }))
        .route(
            "/mindmap",
            post(|| async { Json(json!({ "answer": "```mermaid\nmindmap\n  root((Cells))\n```" })) }),
        )
        .route("/summary", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/study_plan", post(|| async { "not json" }))
        .with_state(seen.clone())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/"), seen)
}

fn backend_for(api_url: &str) -> HttpBackend {
    let config = Config {
        api_url: api_url.to_string(),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    };
    HttpBackend::new(&config).unwrap()
}

#[tokio::test]
async fn ask_round_trip() {
    let (url, seen) = spawn_backend().await;
    let mut client = ChatClient::new(backend_for(&url), ChatLog::new());

    let turn = client.send_message("What is pH?").await;
    assert_eq!(turn, Turn::Answered { spoken: false });
    assert_eq!(client.view().messages().last().unwrap().text, "You asked: What is pH?");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, "/ask");
    assert_eq!(seen[0].1["session_id"], client.session_id().as_str());
}

#[tokio::test]
async fn get_and_post_features() {
    let (url, seen) = spawn_backend().await;
    let backend = backend_for(&url);

    let countdown = backend.call(Intent::Countdown.route(), None).await.unwrap();
    assert_eq!(countdown, AnswerResponse { answer: "42 days to go".into() });

    let mut client = ChatClient::new(backend, ChatLog::new());
    client.request_feature(Intent::Quiz, &mut PresetAnswer::new("Acids")).await.unwrap();
    assert_eq!(seen.lock().unwrap()[0], ("/quiz".to_string(), json!({ "topic": "Acids" })));
}

#[tokio::test]
async fn mind_map_fences_are_stripped() {
    let (url, _) = spawn_backend().await;
    let mut client = ChatClient::new(backend_for(&url), ChatLog::new());

    let turn = client.request_feature(Intent::MindMap, &mut PresetAnswer::new("Cells")).await.unwrap();
    assert!(matches!(turn, Turn::Diagram { rendered: false, .. }));
    match client.view().entries().last().unwrap() {
        edumate_client::services::view::LogEntry::Diagram { source, .. } => {
            assert_eq!(source, "mindmap\n  root((Cells))")
        }
        other => panic!("unexpected entry {other:?}"),
    }
}

#[tokio::test]
async fn error_status_and_bad_body() {
    let (url, _) = spawn_backend().await;
    let backend = backend_for(&url);

    let err = backend.call(Intent::Summary.route(), Some(json!({ "topic": "x" }))).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { path: "/summary", status: 500 }));

    let err = backend
        .call(Intent::StudyPlan.route(), Some(json!({ "subject": "x", "days": "1" })))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_shows_error() {
    // nothing listens on the discard port
    let mut client = ChatClient::new(backend_for("http://127.0.0.1:9"), ChatLog::new());

    assert_eq!(client.send_message("hello").await, Turn::Failed);
    let messages = client.view().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, "⚠️ Error contacting server.");
    assert!(!client.view().is_typing());
}
