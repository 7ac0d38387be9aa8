//! Mock Supabase project for integration tests
//!
//! Keeps uploaded objects and table rows in memory and serves public
//! objects back, so URLs returned by Easel can be fetched.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Service key the mock accepts
pub const SERVICE_KEY: &str = "service-role-test";

/// One stored object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
}

/// Mock Supabase server
pub struct MockSupabase {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    /// Keyed by `bucket/key`
    objects: Mutex<HashMap<String, StoredObject>>,
    /// Insertion order, oldest first
    rows: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    fail_uploads: AtomicBool,
    fail_inserts: AtomicBool,
}

impl MockSupabase {
    /// Start an empty project
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/storage/v1/object/public/{bucket}/{key}", routing::get(handle_public_object))
            .route("/storage/v1/object/{bucket}/{key}", routing::post(handle_upload))
            .route("/rest/v1/{table}", routing::post(handle_insert).get(handle_select))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Project base URL
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make every upload fail with a storage error
    pub fn fail_uploads(&self) {
        self.state.fail_uploads.store(true, Ordering::Relaxed);
    }

    /// Make every insert fail with a PostgREST error
    pub fn fail_inserts(&self) {
        self.state.fail_inserts.store(true, Ordering::Relaxed);
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.state.objects.lock().unwrap().len()
    }

    /// Object stored under `bucket/key`
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.state.objects.lock().unwrap().get(&format!("{bucket}/{key}")).cloned()
    }

    /// All rows, oldest first
    pub fn rows(&self) -> Vec<Value> {
        self.state.rows.lock().unwrap().clone()
    }
}

impl Drop for MockSupabase {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());

    apikey == Some(SERVICE_KEY) && bearer.is_some_and(|b| b == format!("Bearer {SERVICE_KEY}"))
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"statusCode": "403", "error": "Unauthorized", "message": "Invalid Compact JWS"})),
    )
        .into_response()
}

async fn handle_upload(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }

    if state.fail_uploads.load(Ordering::Relaxed) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"statusCode": "404", "error": "Bucket not found", "message": "Bucket not found"})),
        )
            .into_response();
    }

    let path = format!("{bucket}/{key}");
    let object = StoredObject {
        bytes: body,
        content_type: header_string(&headers, header::CONTENT_TYPE),
        cache_control: header_string(&headers, header::CACHE_CONTROL),
    };

    state.objects.lock().unwrap().insert(path.clone(), object);

    Json(json!({"Key": path})).into_response()
}

async fn handle_public_object(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Response {
    let objects = state.objects.lock().unwrap();

    match objects.get(&format!("{bucket}/{key}")) {
        Some(object) => (
            [(
                header::CONTENT_TYPE,
                object.content_type.clone().unwrap_or_else(|| "application/octet-stream".to_owned()),
            )],
            object.bytes.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not_found"}))).into_response(),
    }
}

async fn handle_insert(
    State(state): State<Arc<MockState>>,
    Path(_table): Path<String>,
    headers: HeaderMap,
    Json(record): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }

    if state.fail_inserts.load(Ordering::Relaxed) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "42P01",
                "message": "relation \"public.generated_images\" does not exist"
            })),
        )
            .into_response();
    }

    let Value::Object(mut row) = record else {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "expected an object"}))).into_response();
    };

    let id = state.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    row.insert("id".to_owned(), json!(id));
    row.insert("created_at".to_owned(), json!(jiff::Timestamp::now().to_string()));

    let row = Value::Object(row);
    state.rows.lock().unwrap().push(row.clone());

    (StatusCode::CREATED, Json(row)).into_response()
}

async fn handle_select(
    State(state): State<Arc<MockState>>,
    Path(_table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }

    let mut rows = state.rows.lock().unwrap().clone();
    if query.get("order").map(String::as_str) == Some("created_at.desc") {
        rows.reverse();
    }

    Json(rows).into_response()
}
