pub(crate) mod stability;

use async_trait::async_trait;

use crate::{error::Result, request::ProviderPayload};

/// One generated image as returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Artifact {
    /// Base64-encoded PNG bytes
    pub base64: String,
    /// Seed the provider actually used
    pub seed: Option<u64>,
}

/// Trait for text-to-image provider implementations
#[async_trait]
pub(crate) trait InferenceProvider: Send + Sync {
    /// Check that the configured key is accepted, without generating anything
    async fn verify_credentials(&self) -> Result<()>;

    /// Run one text-to-image inference and return the first artifact
    async fn text_to_image(&self, payload: &ProviderPayload) -> Result<Artifact>;

    /// Get the provider name
    fn name(&self) -> &str;
}
