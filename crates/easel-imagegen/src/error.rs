use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use easel_core::HttpError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Failure modes of the generation pipeline
///
/// Every variant is terminal for the request. The display string is the
/// message returned to the caller.
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// Client input is missing or malformed
    #[error("{0}")]
    InvalidRequest(String),

    /// The deployment's provider key is missing or rejected
    #[error("{0}")]
    InvalidCredentials(String),

    /// The provider or the storage backend cannot serve requests right now
    #[error("{0}")]
    ProviderUnavailable(String),

    /// The provider refused the request because of quota
    #[error("{0}")]
    RateLimited(String),

    /// The provider declined or failed the generation
    #[error("{provider} API error: {status_text}. {message}")]
    GenerationFailed {
        provider: String,
        status: u16,
        status_text: String,
        message: String,
    },

    /// The provider answered outside its documented contract
    #[error("Malformed response from image provider: {0}")]
    MalformedProviderResponse(String),

    /// Uploading the image to object storage failed
    #[error("Failed to upload image: {0}")]
    StorageWriteFailed(String),

    /// Writing the gallery row failed
    #[error("Database error: {0}")]
    MetadataWriteFailed(String),

    /// Reading the gallery rows failed
    #[error("Failed to load generated images: {0}")]
    MetadataReadFailed(String),
}

impl HttpError for ImageGenError {
    /// Every failure is reported as a server error; callers read the message
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::InvalidCredentials(_) => "authentication_error",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::RateLimited(_) => "rate_limit_error",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::MalformedProviderResponse(_) => "malformed_provider_response",
            Self::StorageWriteFailed(_) => "storage_write_failed",
            Self::MetadataWriteFailed(_) => "metadata_write_failed",
            Self::MetadataReadFailed(_) => "metadata_read_failed",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

/// Error body: `{"error": "<message>"}`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ImageGenError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
