use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::{Artifact, InferenceProvider};
use crate::{
    error::{ImageGenError, Result},
    request::ProviderPayload,
};

/// Label used in messages shown to callers
const PROVIDER_LABEL: &str = "Stability AI";

/// Appended to generation errors whose body carries no message
const DEFAULT_FAILURE_HINT: &str = "Please verify your API key and ensure you have sufficient credits.";

/// Stability AI v1 REST provider
pub(crate) struct StabilityProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: Url,
    engine: String,
}

impl StabilityProvider {
    /// Create a provider whose calls time out after `timeout`
    pub fn new(
        name: String,
        api_key: SecretString,
        base_url: Url,
        engine: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client for provider '{name}': {e}"))?;

        Ok(Self {
            name,
            client,
            api_key,
            base_url,
            engine,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments.iter().copied());
        }
        url
    }

    fn unreachable(&self, e: &reqwest::Error) -> ImageGenError {
        tracing::error!(provider = %self.name, error = %e, "provider request failed");
        ImageGenError::ProviderUnavailable(format!("Failed to reach {PROVIDER_LABEL}: {e}"))
    }
}

/// Wire format for the text-to-image response
#[derive(Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<WireArtifact>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArtifact {
    base64: Option<String>,
    seed: Option<u64>,
    finish_reason: Option<String>,
}

/// Wire format for error bodies: `{"id", "name", "message"}`
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[async_trait]
impl InferenceProvider for StabilityProvider {
    async fn verify_credentials(&self) -> Result<()> {
        let url = self.endpoint(&["user", "account"]);

        tracing::debug!(provider = %self.name, "verifying provider credentials");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| self.unreachable(&e))?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        tracing::warn!(provider = %self.name, status = %status, "credential probe rejected");

        Err(if status == StatusCode::UNAUTHORIZED {
            ImageGenError::InvalidCredentials(format!(
                "Invalid {PROVIDER_LABEL} API key. Please check your API key and make sure it is active."
            ))
        } else {
            ImageGenError::ProviderUnavailable(format!(
                "Failed to validate {PROVIDER_LABEL} API key: {}",
                status_text(status)
            ))
        })
    }

    async fn text_to_image(&self, payload: &ProviderPayload) -> Result<Artifact> {
        let url = self.endpoint(&["generation", &self.engine, "text-to-image"]);

        tracing::debug!(
            provider = %self.name,
            engine = %self.engine,
            width = payload.width,
            height = payload.height,
            "sending text-to-image request"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| self.unreachable(&e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            tracing::error!(provider = %self.name, status = %status, "text-to-image request rejected");

            return Err(classify_failure(status, &body));
        }

        let body = response.text().await.map_err(|e| self.unreachable(&e))?;
        let wire: TextToImageResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "failed to parse text-to-image response");
            ImageGenError::MalformedProviderResponse(format!("invalid JSON body: {e}"))
        })?;

        let first = wire
            .artifacts
            .into_iter()
            .next()
            .ok_or_else(|| ImageGenError::MalformedProviderResponse("response contained no artifacts".to_owned()))?;

        if let Some(reason) = first.finish_reason.as_deref().filter(|r| *r != "SUCCESS") {
            tracing::warn!(provider = %self.name, finish_reason = reason, "artifact finished abnormally");
        }

        let base64 = first
            .base64
            .filter(|data| !data.is_empty())
            .ok_or_else(|| ImageGenError::MalformedProviderResponse("artifact has no image data".to_owned()))?;

        tracing::debug!(provider = %self.name, "text-to-image request complete");

        Ok(Artifact {
            base64,
            seed: first.seed,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

/// Map a non-success inference response onto the error taxonomy
fn classify_failure(status: StatusCode, body: &str) -> ImageGenError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    match status {
        StatusCode::TOO_MANY_REQUESTS => ImageGenError::RateLimited(format!(
            "{PROVIDER_LABEL} rate limit reached: {}",
            message.as_deref().unwrap_or("too many requests")
        )),
        StatusCode::SERVICE_UNAVAILABLE => ImageGenError::ProviderUnavailable(format!(
            "{PROVIDER_LABEL} is temporarily unavailable: {}",
            message.as_deref().unwrap_or(status_text(status))
        )),
        _ => ImageGenError::GenerationFailed {
            provider: PROVIDER_LABEL.to_owned(),
            status: status.as_u16(),
            status_text: status_text(status).to_owned(),
            message: message.unwrap_or_else(|| DEFAULT_FAILURE_HINT.to_owned()),
        },
    }
}
