//! Text-to-image generation pipeline and its HTTP endpoints

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod credentials;
mod error;
mod provider;
pub mod request;
mod server;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use easel_core::{GeneratedImage, GenerationRequest, HttpError};

pub use error::{ImageGenError, Result};
pub use server::{ImageGenServerBuilder, Server};

/// Build the generation server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &easel_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        ImageGenServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize image generation server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for generation and listing
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/generate-art", post(generate))
        .route("/images", get(list_images))
}

/// Handle image generation requests
async fn generate(
    State(server): State<Arc<Server>>,
    body: std::result::Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GeneratedImage>> {
    let Json(request) = body.map_err(|rejection| {
        ImageGenError::InvalidRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    tracing::debug!(style = %request.style, size = %request.size, "generation handler called");

    let image = server.generate(&request).await.inspect_err(log_failure)?;

    Ok(Json(image))
}

/// Handle gallery listing requests
async fn list_images(State(server): State<Arc<Server>>) -> Result<Json<Vec<GeneratedImage>>> {
    let images = server.list().await.inspect_err(log_failure)?;

    tracing::debug!(count = images.len(), "listed generated images");

    Ok(Json(images))
}

fn log_failure(error: &ImageGenError) {
    tracing::warn!(error_type = error.error_type(), error = %error, "request failed");
}
