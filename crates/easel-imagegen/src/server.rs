use std::{sync::Arc, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use easel_config::ProviderType;
use easel_core::{GeneratedImage, GenerationRequest};
use easel_storage::{MetadataStore, NewImageRecord, ObjectStore, SupabaseStorage};

use crate::{
    credentials::CredentialCache,
    error::{ImageGenError, Result},
    provider::{InferenceProvider, stability::StabilityProvider},
    request,
};

const PNG_CONTENT_TYPE: &str = "image/png";

/// Blob and metadata stores used together by one deployment
struct Persistence {
    objects: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
}

/// Generation pipeline: validate, probe, infer, upload, record
///
/// Missing provider or storage settings do not prevent construction. They
/// fail each request instead so the process keeps serving health checks.
pub struct Server {
    provider: Option<Box<dyn InferenceProvider>>,
    persistence: Option<Persistence>,
    credentials: CredentialCache,
}

impl Server {
    /// Run one generation request to a persisted image
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let payload = request::validate(request)?;

        let provider = self.provider.as_deref().ok_or_else(missing_api_key)?;
        let persistence = self.persistence.as_ref().ok_or_else(missing_storage)?;

        self.ensure_credentials(provider).await?;

        let artifact = provider.text_to_image(&payload).await?;
        tracing::debug!(provider = provider.name(), seed = ?artifact.seed, "image generated");

        let bytes = decode_image(&artifact.base64)?;

        let key = easel_storage::object_key();
        let stored = persistence
            .objects
            .upload(&key, bytes, PNG_CONTENT_TYPE)
            .await
            .map_err(|e| ImageGenError::StorageWriteFailed(e.to_string()))?;

        let url = persistence.objects.public_url(&stored.key);

        let record = NewImageRecord {
            prompt: request.prompt.clone(),
            style: request.style.clone(),
            size: request.size.clone(),
            url: url.to_string(),
            negative_prompt: request.negative_prompt.clone(),
        };

        let image = persistence.metadata.insert(&record).await.map_err(|e| {
            tracing::warn!(key = %stored.key, "uploaded object has no metadata row");
            ImageGenError::MetadataWriteFailed(e.to_string())
        })?;

        tracing::info!(id = %image.id, key = %stored.key, style = %image.style, "generated image stored");

        Ok(image)
    }

    /// All generated images, newest first
    pub async fn list(&self) -> Result<Vec<GeneratedImage>> {
        let persistence = self.persistence.as_ref().ok_or_else(missing_storage)?;

        persistence
            .metadata
            .list()
            .await
            .map_err(|e| ImageGenError::MetadataReadFailed(e.to_string()))
    }

    async fn ensure_credentials(&self, provider: &dyn InferenceProvider) -> Result<()> {
        if self.credentials.is_verified(provider.name()) {
            tracing::debug!(provider = provider.name(), "credential probe skipped (cached)");
            return Ok(());
        }

        provider.verify_credentials().await?;
        self.credentials.mark_verified(provider.name());

        Ok(())
    }
}

fn missing_api_key() -> ImageGenError {
    ImageGenError::InvalidCredentials(
        "Image provider API key not found. Please set provider.api_key in the server configuration.".to_owned(),
    )
}

fn missing_storage() -> ImageGenError {
    ImageGenError::ProviderUnavailable(
        "Storage configuration is missing. Please set storage.url and storage.service_key.".to_owned(),
    )
}

fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ImageGenError::MalformedProviderResponse(format!("artifact is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(ImageGenError::MalformedProviderResponse(
            "artifact decoded to zero bytes".to_owned(),
        ));
    }

    Ok(bytes)
}

/// Builder for constructing the generation server from configuration
pub struct ImageGenServerBuilder<'a> {
    config: &'a easel_config::Config,
}

impl<'a> ImageGenServerBuilder<'a> {
    pub fn new(config: &'a easel_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let provider_config = &self.config.provider;

        let provider: Option<Box<dyn InferenceProvider>> = match &provider_config.api_key {
            Some(api_key) => match provider_config.provider_type {
                ProviderType::Stability => {
                    tracing::debug!(engine = %provider_config.engine, "initializing Stability AI provider");

                    Some(Box::new(StabilityProvider::new(
                        "stability".to_owned(),
                        api_key.clone(),
                        provider_config.base_url.clone(),
                        provider_config.engine.clone(),
                        Duration::from_secs(provider_config.timeout_secs),
                    )?))
                }
            },
            None => {
                tracing::debug!("no provider API key configured");
                None
            }
        };

        let persistence = SupabaseStorage::from_config(&self.config.storage)
            .map_err(|e| anyhow::anyhow!("failed to initialize storage: {e}"))?
            .map(|storage| {
                let storage = Arc::new(storage);
                Persistence {
                    objects: Arc::clone(&storage) as Arc<dyn ObjectStore>,
                    metadata: storage,
                }
            });

        if persistence.is_none() {
            tracing::debug!("no storage backend configured");
        }

        Ok(Server {
            provider,
            persistence,
            credentials: CredentialCache::new(provider_config.credential_cache_ttl_secs),
        })
    }
}
