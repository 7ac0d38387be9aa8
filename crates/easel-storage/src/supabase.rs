use std::time::Duration;

use async_trait::async_trait;
use easel_config::StorageConfig;
use easel_core::GeneratedImage;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Result, StorageError};
use crate::metadata::{MetadataStore, NewImageRecord};
use crate::object::{ObjectStore, StoredObject};

/// PostgREST media type that returns a single object instead of an array
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Storage and metadata client for a Supabase-compatible project
#[derive(Clone)]
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: Url,
    service_key: SecretString,
    bucket: String,
    table: String,
    cache_control_secs: u64,
}

impl SupabaseStorage {
    /// Create a client with the default bucket, table and cache policy
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot carry a path or the HTTP client
    /// cannot be built
    pub fn new(base_url: Url, service_key: SecretString, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Config(format!("`{base_url}` is not a base URL")));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StorageError::Request)?;

        Ok(Self {
            http,
            base_url,
            service_key,
            bucket: "ai-art".to_owned(),
            table: "generated_images".to_owned(),
            cache_control_secs: 3600,
        })
    }

    /// Build from configuration; `None` when the URL or key is missing
    ///
    /// # Errors
    ///
    /// Returns an error if the configured values are unusable
    pub fn from_config(config: &StorageConfig) -> Result<Option<Self>> {
        let (Some(url), Some(key)) = (&config.url, &config.service_key) else {
            return Ok(None);
        };

        let storage = Self::new(url.clone(), key.clone(), Duration::from_secs(config.timeout_secs))?
            .with_bucket(&config.bucket)
            .with_table(&config.table)
            .with_cache_control_secs(config.cache_control_secs);

        Ok(Some(storage))
    }

    /// Use a different bucket for uploads
    #[must_use]
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        bucket.clone_into(&mut self.bucket);
        self
    }

    /// Use a different metadata table
    #[must_use]
    pub fn with_table(mut self, table: &str) -> Self {
        table.clone_into(&mut self.table);
        self
    }

    /// Cache lifetime attached to uploaded objects
    #[must_use]
    pub const fn with_cache_control_secs(mut self, secs: u64) -> Self {
        self.cache_control_secs = secs;
        self
    }

    /// Append path segments to the project URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments.iter().copied());
        }
        url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.service_key.expose_secret();
        builder.header("apikey", key).bearer_auth(key)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredObject> {
        let url = self.endpoint(&["storage", "v1", "object", &self.bucket, key]);
        let size = bytes.len();

        tracing::debug!(bucket = %self.bucket, key = %key, size, "uploading object");

        let response = self
            .authorized(self.http.post(url))
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, format!("max-age={}", self.cache_control_secs))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(StoredObject { key: key.to_owned() })
    }

    fn public_url(&self, key: &str) -> Url {
        self.endpoint(&["storage", "v1", "object", "public", &self.bucket, key])
    }
}

#[async_trait]
impl MetadataStore for SupabaseStorage {
    async fn insert(&self, record: &NewImageRecord) -> Result<GeneratedImage> {
        let url = self.endpoint(&["rest", "v1", &self.table]);

        let response = self
            .authorized(self.http.post(url))
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        read_json(response).await
    }

    async fn list(&self) -> Result<Vec<GeneratedImage>> {
        let url = self.endpoint(&["rest", "v1", &self.table]);

        let response = self
            .authorized(self.http.get(url))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        read_json(response).await
    }
}

impl std::fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| StorageError::Decode(e.to_string()))
}

/// Error body shape shared by the storage and PostgREST APIs
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

async fn api_error(response: reqwest::Response) -> StorageError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
        .or_else(|| Some(body.trim().to_owned()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_owned());

    tracing::debug!(status = %status, message = %message, "storage API error");

    StorageError::Api {
        status: status.as_u16(),
        message,
    }
}
