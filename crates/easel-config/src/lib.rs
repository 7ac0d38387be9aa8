#![allow(clippy::must_use_candidate)]

pub mod cors;
mod de;
mod env;
pub mod health;
mod loader;
pub mod provider;
pub mod server;
pub mod storage;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use provider::*;
pub use server::*;
pub use storage::*;
pub use telemetry::*;

/// Top-level Easel configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Inference provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Object storage and metadata store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
