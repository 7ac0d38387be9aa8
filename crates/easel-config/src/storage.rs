use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Object storage and metadata store configuration
///
/// Both live behind one Supabase-compatible project: objects under
/// `/storage/v1`, rows under `/rest/v1`. Missing `url` or `service_key`
/// does not stop the server; generation requests fail until they are set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    #[serde(default, deserialize_with = "crate::de::optional_url")]
    pub url: Option<Url>,
    /// Service key sent as `apikey` and bearer token
    #[serde(default, deserialize_with = "crate::de::optional_secret")]
    pub service_key: Option<SecretString>,
    /// Bucket that receives generated images
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Table holding generation metadata
    #[serde(default = "default_table")]
    pub table: String,
    /// `Cache-Control` max-age attached to uploaded objects
    #[serde(default = "default_cache_control_secs")]
    pub cache_control_secs: u64,
    /// Per-request timeout for storage calls in seconds
    #[serde(default = "crate::provider::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            bucket: default_bucket(),
            table: default_table(),
            cache_control_secs: default_cache_control_secs(),
            timeout_secs: crate::provider::default_timeout_secs(),
        }
    }
}

impl StorageConfig {
    /// Whether both the endpoint and the key are present
    pub const fn is_configured(&self) -> bool {
        self.url.is_some() && self.service_key.is_some()
    }
}

fn default_bucket() -> String {
    "ai-art".to_owned()
}

fn default_table() -> String {
    "generated_images".to_owned()
}

const fn default_cache_control_secs() -> u64 {
    3600
}
