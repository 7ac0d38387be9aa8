use std::fmt;

use easel_core::{GeneratedImage, GenerationRequest};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use url::Url;

use crate::error::{EaselClientError, GENERIC_FAILURE, Result};

const SERVICE_UNAVAILABLE: &str = "The AI service is currently unavailable. Please try again in a few minutes.";
const TOO_MANY_REQUESTS: &str = "Too many requests. Please wait a moment before trying again.";
const TEMPORARILY_UNAVAILABLE: &str = "The AI service is temporarily unavailable. Please try again later.";

/// Typed client for the Easel server
#[derive(Clone)]
pub struct EaselClient {
    base_url: Url,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl fmt::Debug for EaselClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EaselClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl EaselClient {
    /// Create a new client pointing at the given base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| EaselClientError::Config(format!("invalid base URL: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(EaselClientError::Config(format!("`{base_url}` is not a base URL")));
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            api_key: None,
        })
    }

    /// Send a bearer token with every request
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Get the base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Generate and persist one image
    ///
    /// Failures carry a message meant for end users; the server's own
    /// error string is kept alongside it as `detail`.
    pub async fn generate_image(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let url = make_url(&self.base_url, &["generate-art"]);

        let response = self.authorized(self.http.post(url)).json(request).send().await?;
        let response = handle_error(response).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EaselClientError::Parse(e.to_string()))?;

        if !body["url"].as_str().is_some_and(|url| !url.is_empty()) {
            return Err(EaselClientError::Incomplete);
        }

        serde_json::from_value(body).map_err(|e| EaselClientError::Parse(e.to_string()))
    }

    /// All generated images, newest first
    pub async fn fetch_generated_images(&self) -> Result<Vec<GeneratedImage>> {
        let url = make_url(&self.base_url, &["images"]);

        let response = self.authorized(self.http.get(url)).send().await?;
        let response = handle_error(response).await?;

        response
            .json()
            .await
            .map_err(|e| EaselClientError::Parse(e.to_string()))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(AUTHORIZATION, format!("Bearer {key}")),
            None => builder,
        }
    }
}

/// Append path segments to the base URL
fn make_url(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments.iter().copied());
    }
    url
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = parse_error_body(&body);

    Err(EaselClientError::Api {
        status: status.as_u16(),
        message: user_facing_message(status, detail.as_deref()),
        detail,
    })
}

/// Extract `error` from a `{"error": "..."}` body
fn parse_error_body(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"].as_str().map(str::to_owned))
        .filter(|message| !message.is_empty())
}

fn user_facing_message(status: StatusCode, detail: Option<&str>) -> String {
    if detail.is_some_and(|d| d.contains("API key")) {
        return SERVICE_UNAVAILABLE.to_owned();
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => TOO_MANY_REQUESTS.to_owned(),
        StatusCode::SERVICE_UNAVAILABLE => TEMPORARILY_UNAVAILABLE.to_owned(),
        _ => detail.unwrap_or(GENERIC_FAILURE).to_owned(),
    }
}
