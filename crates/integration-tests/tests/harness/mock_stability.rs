//! Mock Stability AI backend for integration tests
//!
//! Serves the account probe and the text-to-image endpoint, counting calls
//! and recording the last inference body.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Key the mock accepts
pub const VALID_KEY: &str = "sk-test-stability";

/// Bytes returned as the generated image
pub const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmock-image";

/// Shape of a successful text-to-image response
#[derive(Debug, Clone, Copy)]
pub enum ArtifactMode {
    /// One artifact carrying [`IMAGE_BYTES`]
    Image,
    /// `{"artifacts": []}`
    Empty,
    /// One artifact without a `base64` field
    MissingData,
}

/// Mock Stability server
pub struct MockStability {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    probe_count: AtomicU32,
    inference_count: AtomicU32,
    mode: ArtifactMode,
    /// Status returned by the inference endpoint instead of success
    inference_failure: Option<(u16, Value)>,
    last_inference: Mutex<Option<Value>>,
    last_engine: Mutex<Option<String>>,
}

impl MockStability {
    /// Start a mock that returns one image
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(ArtifactMode::Image, None).await
    }

    /// Start a mock with the given artifact shape
    pub async fn start_with(mode: ArtifactMode) -> anyhow::Result<Self> {
        Self::start_inner(mode, None).await
    }

    /// Start a mock whose inference endpoint fails with `status` and `body`
    pub async fn start_failing(status: u16, body: Value) -> anyhow::Result<Self> {
        Self::start_inner(ArtifactMode::Image, Some((status, body))).await
    }

    async fn start_inner(mode: ArtifactMode, inference_failure: Option<(u16, Value)>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            probe_count: AtomicU32::new(0),
            inference_count: AtomicU32::new(0),
            mode,
            inference_failure,
            last_inference: Mutex::new(None),
            last_engine: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/user/account", routing::get(handle_account))
            .route("/v1/generation/{engine}/text-to-image", routing::post(handle_text_to_image))
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

    /// Base URL including the `/v1` prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of account probes received
    pub fn probe_count(&self) -> u32 {
        self.state.probe_count.load(Ordering::Relaxed)
    }

    /// Number of text-to-image requests received
    pub fn inference_count(&self) -> u32 {
        self.state.inference_count.load(Ordering::Relaxed)
    }

    /// Body of the last text-to-image request
    pub fn last_inference(&self) -> Option<Value> {
        self.state.last_inference.lock().unwrap().clone()
    }

    /// Engine segment of the last text-to-image request
    pub fn last_engine(&self) -> Option<String> {
        self.state.last_engine.lock().unwrap().clone()
    }
}

impl Drop for MockStability {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_KEY}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"id": "x", "name": "unauthorized", "message": "missing or invalid API key"})),
    )
        .into_response()
}

async fn handle_account(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.probe_count.fetch_add(1, Ordering::Relaxed);

    if !authorized(&headers) {
        return unauthorized();
    }

    Json(json!({"id": "user-1", "email": "artist@example.com", "organizations": []})).into_response()
}

async fn handle_text_to_image(
    State(state): State<Arc<MockState>>,
    Path(engine): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.inference_count.fetch_add(1, Ordering::Relaxed);
    *state.last_inference.lock().unwrap() = Some(body);
    *state.last_engine.lock().unwrap() = Some(engine);

    if !authorized(&headers) {
        return unauthorized();
    }

    if let Some((status, body)) = &state.inference_failure {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(body.clone())).into_response();
    }

    let artifacts = match state.mode {
        ArtifactMode::Image => json!([{
            "base64": STANDARD.encode(IMAGE_BYTES),
            "seed": 1_234_567,
            "finishReason": "SUCCESS"
        }]),
        ArtifactMode::Empty => json!([]),
        ArtifactMode::MissingData => json!([{"seed": 1, "finishReason": "ERROR"}]),
    };

    Json(json!({"artifacts": artifacts})).into_response()
}
