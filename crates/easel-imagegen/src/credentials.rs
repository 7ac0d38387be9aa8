use std::time::Duration;

use mini_moka::sync::Cache;

/// Remembers providers whose credential probe recently succeeded
///
/// Only successes are stored, so a rejected key is probed again on the
/// next request. A TTL of zero disables the cache and every request probes.
#[derive(Clone)]
pub(crate) struct CredentialCache {
    verified: Option<Cache<String, ()>>,
}

impl CredentialCache {
    /// Create a cache with the given TTL in seconds
    pub fn new(ttl_secs: u64) -> Self {
        let verified = (ttl_secs > 0).then(|| {
            Cache::builder()
                .max_capacity(64)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });

        Self { verified }
    }

    /// Whether `provider` passed a probe within the TTL
    pub fn is_verified(&self, provider: &str) -> bool {
        self.verified
            .as_ref()
            .is_some_and(|cache| cache.contains_key(&provider.to_owned()))
    }

    /// Record a successful probe for `provider`
    pub fn mark_verified(&self, provider: &str) {
        if let Some(cache) = &self.verified {
            cache.insert(provider.to_owned(), ());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_cache_never_remembers() {
        let cache = CredentialCache::new(0);
        cache.mark_verified("stability");
        assert!(!cache.is_verified("stability"));
    }

    #[test]
    fn enabled_cache_remembers_per_provider() {
        let cache = CredentialCache::new(60);
        assert!(!cache.is_verified("stability"));

        cache.mark_verified("stability");

        assert!(cache.is_verified("stability"));
        assert!(!cache.is_verified("other"));
    }

    #[test]
    fn clones_share_entries() {
        let cache = CredentialCache::new(60);
        let handle = cache.clone();

        handle.mark_verified("stability");

        assert!(cache.is_verified("stability"));
    }
}
