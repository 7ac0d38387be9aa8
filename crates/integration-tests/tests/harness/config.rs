//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use easel_config::{Config, CorsConfig, ProviderConfig, ServerConfig, StorageConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration: no provider key, no storage
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Point the provider at a mock Stability server
    pub fn with_stability(mut self, base_url: &str, api_key: &str) -> Self {
        self.config.provider = ProviderConfig {
            api_key: Some(SecretString::from(api_key)),
            base_url: base_url.parse().expect("valid URL"),
            timeout_secs: 10,
            ..ProviderConfig::default()
        };
        self
    }

    /// Point storage at a mock Supabase server
    pub fn with_supabase(mut self, base_url: &str, service_key: &str) -> Self {
        self.config.storage = StorageConfig {
            url: Some(base_url.parse().expect("valid URL")),
            service_key: Some(SecretString::from(service_key)),
            timeout_secs: 10,
            ..StorageConfig::default()
        };
        self
    }

    /// Remember successful credential probes for `secs`
    pub fn with_credential_cache(mut self, secs: u64) -> Self {
        self.config.provider.credential_cache_ttl_secs = secs;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
