//! Mock Stump server for testing
//!
//! Simulates the GraphQL endpoint at /graphql: resolves the book query from
//! seeded fixtures, records progress mutations, and injects failures on
//! demand.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// A recorded progress mutation
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedSubmission {
    Page {
        id: String,
        page: i64,
        elapsed_seconds: i64,
    },
    Epub {
        id: String,
        epubcfi: String,
        percentage: f64,
        elapsed_seconds: i64,
    },
}

struct MockStumpState {
    books: HashMap<String, Value>,
    submissions: Vec<RecordedSubmission>,
    // Number of mutation requests to fail before succeeding again
    failures_remaining: u32,
}

/// Mock Stump server
pub struct MockStumpServer {
    addr: SocketAddr,
    state: Arc<RwLock<MockStumpState>>,
    handle: JoinHandle<()>,
}

impl MockStumpServer {
    /// Start a mock Stump server on a random port
    pub async fn start() -> Self {
        // RUST_LOG controls test output; repeated init attempts are fine
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let state = Arc::new(RwLock::new(MockStumpState {
            books: HashMap::new(),
            submissions: Vec::new(),
            failures_remaining: 0,
        }));

        let app = Router::new()
            .route("/graphql", post(handle_graphql))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Seed a book fixture, returned verbatim by the book query
    pub async fn add_book(&self, book: Value) {
        let id = book["id"].as_str().unwrap().to_string();
        let mut state = self.state.write().await;
        state.books.insert(id, book);
    }

    /// Fail the next `n` mutation requests with an HTTP 500
    pub async fn fail_next(&self, n: u32) {
        let mut state = self.state.write().await;
        state.failures_remaining = n;
    }

    /// Progress mutations recorded so far
    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        let state = self.state.read().await;
        state.submissions.clone()
    }
}

impl Drop for MockStumpServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlRequest {
    query: String,
    #[serde(default)]
    variables: Value,
}

async fn handle_graphql(
    State(state): State<Arc<RwLock<MockStumpState>>>,
    Json(request): Json<GraphqlRequest>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.write().await;

    if request.query.contains("mediaById") {
        let id = request.variables["id"].as_str().unwrap_or_default();
        let book = state.books.get(id).cloned().unwrap_or(Value::Null);
        return Ok(Json(json!({ "data": { "mediaById": book } })));
    }

    // Mutations share the failure-injection counter
    if state.failures_remaining > 0 {
        state.failures_remaining -= 1;
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if request.query.contains("updateMediaProgress") {
        let vars = &request.variables;
        state.submissions.push(RecordedSubmission::Page {
            id: vars["id"].as_str().unwrap_or_default().to_string(),
            page: vars["page"].as_i64().unwrap_or_default(),
            elapsed_seconds: vars["elapsedSeconds"].as_i64().unwrap_or_default(),
        });
        return Ok(Json(json!({
            "data": { "updateMediaProgress": { "__typename": "ReadProgress" } }
        })));
    }

    if request.query.contains("updateEpubProgress") {
        let input = &request.variables["input"];
        state.submissions.push(RecordedSubmission::Epub {
            id: request.variables["id"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            epubcfi: input["epubcfi"].as_str().unwrap_or_default().to_string(),
            percentage: input["percentage"].as_f64().unwrap_or_default(),
            elapsed_seconds: input["elapsedSeconds"].as_i64().unwrap_or_default(),
        });
        return Ok(Json(json!({
            "data": { "updateEpubProgress": { "__typename": "ReadProgress" } }
        })));
    }

    Ok(Json(json!({
        "data": null,
        "errors": [{ "message": "unknown operation" }]
    })))
}

/// A cbz fixture with persisted progress
pub fn comic_fixture(id: &str, pages: i64, page: Option<i64>, elapsed: Option<i64>) -> Value {
    json!({
        "id": id,
        "name": "Test Comic",
        "pages": pages,
        "extension": "cbz",
        "readProgress": page.map(|p| json!({
            "page": p,
            "epubcfi": null,
            "percentageCompleted": null,
            "elapsedSeconds": elapsed,
        })),
        "libraryConfig": null,
    })
}

/// An epub fixture with persisted progress
pub fn epub_fixture(id: &str, epubcfi: Option<&str>, elapsed: Option<i64>) -> Value {
    json!({
        "id": id,
        "name": "Test Novel",
        "pages": 0,
        "extension": "epub",
        "readProgress": epubcfi.map(|cfi| json!({
            "page": null,
            "epubcfi": cfi,
            "percentageCompleted": 0.25,
            "elapsedSeconds": elapsed,
        })),
        "libraryConfig": null,
    })
}
