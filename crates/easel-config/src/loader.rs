use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// Expands `{{ env.VAR }}` placeholders first, then deserializes and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Missing secrets are not an error here: they surface per request so
    /// the service keeps answering health checks and listing errors.
    ///
    /// # Errors
    ///
    /// Returns an error if a required name is blank or a timeout is zero
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_provider()?;
        self.validate_storage()?;
        Ok(())
    }

    fn validate_provider(&self) -> anyhow::Result<()> {
        if self.provider.engine.trim().is_empty() {
            anyhow::bail!("provider.engine must not be empty");
        }

        if self.provider.timeout_secs == 0 {
            anyhow::bail!("provider.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        let storage = &self.storage;

        if storage.bucket.trim().is_empty() {
            anyhow::bail!("storage.bucket must not be empty");
        }

        if storage.table.trim().is_empty() {
            anyhow::bail!("storage.table must not be empty");
        }

        if storage.timeout_secs == 0 {
            anyhow::bail!("storage.timeout_secs must be greater than 0");
        }

        if storage
            .url
            .as_ref()
            .is_some_and(url::Url::cannot_be_a_base)
        {
            anyhow::bail!("storage.url must be a base URL");
        }

        Ok(())
    }

    /// Settings left unset that generation requests need
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.provider.api_key.is_none() {
            missing.push("provider.api_key");
        }

        if self.storage.url.is_none() {
            missing.push("storage.url");
        }

        if self.storage.service_key.is_none() {
            missing.push("storage.service_key");
        }

        missing
    }

    /// Log each missing secret; call once a subscriber is installed
    pub fn warn_missing_secrets(&self) {
        for setting in self.missing_secrets() {
            tracing::warn!(setting, "not set; generation requests will be rejected");
        }
    }
}
