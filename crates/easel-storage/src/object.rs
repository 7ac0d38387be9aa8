use async_trait::async_trait;
use url::Url;

use crate::error::Result;

/// Location of an object after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key within the bucket
    pub key: String,
}

/// Blob storage for generated images
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` under `key`
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredObject>;

    /// Publicly reachable URL for an uploaded key
    ///
    /// Pure derivation; any key accepted by [`ObjectStore::upload`] resolves.
    fn public_url(&self, key: &str) -> Url;
}
