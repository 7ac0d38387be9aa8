use async_trait::async_trait;
use easel_core::GeneratedImage;
use serde::Serialize;

use crate::error::Result;

/// Row written after a successful upload
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewImageRecord {
    pub prompt: String,
    pub style: String,
    pub size: String,
    pub url: String,
    pub negative_prompt: Option<String>,
}

/// Relational store for gallery metadata
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a record and return the stored row
    async fn insert(&self, record: &NewImageRecord) -> Result<GeneratedImage>;

    /// All records, newest first
    async fn list(&self) -> Result<Vec<GeneratedImage>>;
}
