use std::sync::Arc;

use api::AppState;
use contextor::{Contextor, ContextorConfig, ContextorError, GenerateFuture, TextGenerator};
use rag_store::{
    DistanceKind, EmbedFuture, EmbeddingsProvider, RagConfig, RagRecord, RagStore, VectorIndex,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::{net::TcpListener, sync::oneshot};

struct TopicEmbedder;

impl EmbeddingsProvider for TopicEmbedder {
    fn model_name(&self) -> &str {
        "topic"
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        let v = if text.to_lowercase().contains("isa") {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        };
        Box::pin(async move { Ok(v) })
    }
}

struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    fn generate<'a>(&'a self, prompt: &'a str, temperature: Option<f32>) -> GenerateFuture<'a> {
        let out = format!("t={temperature:?} len={}", prompt.len());
        Box::pin(async move { Ok(out) })
    }
}

struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate<'a>(&'a self, _prompt: &'a str, _t: Option<f32>) -> GenerateFuture<'a> {
        Box::pin(async { Err(ContextorError::Generation("upstream timed out".into())) })
    }
}

fn record(text: String, source: Option<&str>) -> RagRecord {
    RagRecord {
        text,
        source: source.map(str::to_string),
        kind: None,
        chunk_index: 0,
    }
}

/// Keep the returned directory alive for as long as the state is served.
async fn loaded_state(generator: Arc<dyn TextGenerator>) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![
        (vec![1.0, 0.0], record("ISA allowance ".repeat(40), Some("isa.pdf"))),
        (vec![0.9, 0.1], record("ISA transfers".into(), Some("isa.pdf"))),
        (vec![0.0, 1.0], record("Pension basics".into(), None)),
        (vec![0.1, 0.9], record("Mortgage terms".into(), Some("home.docx"))),
    ];
    let index = VectorIndex::create(dir.path(), "topic", DistanceKind::L2, rows)
        .await
        .unwrap();

    let store = RagStore::from_index(RagConfig::new_default(dir.path()), index);
    let contextor = Contextor::new(
        store,
        Arc::new(TopicEmbedder),
        generator,
        ContextorConfig::default(),
    );
    (dir, AppState::new(Arc::new(contextor)))
}

/// Spawns the server on an ephemeral port; dropping the sender stops it.
async fn spawn(state: AppState) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        api::serve(listener, state, async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });
    (base, tx)
}

async fn post_query(base: &str, body: Value) -> (u16, Value) {
    let res = reqwest::Client::new()
        .post(format!("{base}/api/query"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_reports_whether_an_index_is_loaded() {
    let (base, _stop) = spawn(AppState::unloaded()).await;
    let body: Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok", "vectorstore_loaded": false}));

    let (_dir, state) = loaded_state(Arc::new(EchoGenerator)).await;
    let (base, _stop) = spawn(state).await;
    let body: Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["vectorstore_loaded"], true);
}

#[tokio::test]
async fn blank_or_missing_query_is_a_client_error() {
    let (_dir, state) = loaded_state(Arc::new(EchoGenerator)).await;
    let (base, _stop) = spawn(state).await;

    for body in [json!({"query": ""}), json!({"query": "   \n"}), json!({})] {
        let (status, payload) = post_query(&base, body).await;
        assert_eq!(status, 400);
        assert_eq!(payload, json!({"error": "Query cannot be empty"}));
    }
}

#[tokio::test]
async fn malformed_json_is_a_client_error_with_error_field() {
    let (_dir, state) = loaded_state(Arc::new(EchoGenerator)).await;
    let (base, _stop) = spawn(state).await;
    let res = reqwest::Client::new()
        .post(format!("{base}/api/query"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
    let payload: Value = res.json().await.unwrap();
    assert!(payload["error"].is_string());
}

#[tokio::test]
async fn valid_query_returns_answer_sources_and_truncated_context() {
    let (_dir, state) = loaded_state(Arc::new(EchoGenerator)).await;
    let (base, _stop) = spawn(state).await;
    let (status, payload) = post_query(&base, json!({"query": "What is an ISA?"})).await;
    assert_eq!(status, 200);

    assert!(payload["answer"].as_str().unwrap().starts_with("t=Some(0.7)"));

    let chunks = payload["context_chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 3);
    let first = chunks[0]["content"].as_str().unwrap();
    assert_eq!(first.chars().count(), 303);
    assert!(first.ends_with("..."));
    assert_eq!(chunks[0]["score"].as_f64().unwrap(), 0.0);
    assert_eq!(chunks[1]["content"], "ISA transfers...");
    assert_eq!(chunks[2]["source"], "home.docx");

    let sources: Vec<&str> = payload["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(sources, vec!["isa.pdf", "home.docx"]);
}

#[tokio::test]
async fn generation_failure_is_a_server_error_with_message() {
    let (_dir, state) = loaded_state(Arc::new(FailingGenerator)).await;
    let (base, _stop) = spawn(state).await;
    let (status, payload) = post_query(&base, json!({"query": "ISA limits"})).await;
    assert_eq!(status, 500);
    assert_eq!(payload, json!({"error": "generation failed: upstream timed out"}));
}

#[tokio::test]
async fn query_without_index_is_a_server_error() {
    let (base, _stop) = spawn(AppState::unloaded()).await;
    let (status, payload) = post_query(&base, json!({"query": "anything"})).await;
    assert_eq!(status, 500);
    assert!(
        payload["error"]
            .as_str()
            .unwrap()
            .contains("Run ingestion first")
    );
}

#[tokio::test]
async fn index_page_is_served() {
    let (base, _stop) = spawn(AppState::unloaded()).await;
    let res = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(res.text().await.unwrap().contains("/api/query"));
}
