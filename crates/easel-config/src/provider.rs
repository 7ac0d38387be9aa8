use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Stability AI REST API base URL
pub const DEFAULT_STABILITY_BASE_URL: &str = "https://api.stability.ai/v1";

/// Default text-to-image engine
pub const DEFAULT_STABILITY_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Text-to-image inference provider configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider type
    #[serde(rename = "type", default)]
    pub provider_type: ProviderType,
    /// API key; requests fail with a credentials error while unset
    #[serde(default, deserialize_with = "crate::de::optional_secret")]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default = "default_base_url", deserialize_with = "crate::de::http_url")]
    pub base_url: Url,
    /// Engine identifier used in the text-to-image path
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Per-request timeout for provider calls in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Remember a successful credential probe for this many seconds (0 disables)
    #[serde(default)]
    pub credential_cache_ttl_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            api_key: None,
            base_url: default_base_url(),
            engine: default_engine(),
            timeout_secs: default_timeout_secs(),
            credential_cache_ttl_secs: 0,
        }
    }
}

/// Supported inference providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Stability AI v1 REST API
    #[default]
    Stability,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_STABILITY_BASE_URL).expect("default base URL must parse")
}

fn default_engine() -> String {
    DEFAULT_STABILITY_ENGINE.to_owned()
}

pub(crate) const fn default_timeout_secs() -> u64 {
    120
}
