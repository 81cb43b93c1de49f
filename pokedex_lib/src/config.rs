//! Runtime configuration read from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration against the public PokéAPI.

use std::time::Duration;

use crate::cache::MemoryCache;
use crate::client::RetryConfig;

/// How long a cached record is served without refetching.
pub const DEFAULT_FRESH_SECS: u64 = 300;
/// How long an unused cached record is kept at all.
pub const DEFAULT_EVICT_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq)]
pub struct PokedexConfig {
    /// Upstream base URL, without a trailing slash.
    pub base_url: String,
    /// Upstream resource collection.
    pub resource: String,
    pub timeout: Duration,
    pub fresh_ttl: Duration,
    pub evict_ttl: Duration,
    pub retry: RetryConfig,
}

impl Default for PokedexConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

impl PokedexConfig {
    /// Reads `POKEDEX_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = get("POKEDEX_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| pokedex_api::DEFAULT_BASE_URL.to_string());
        let resource = get("POKEDEX_RESOURCE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| pokedex_api::DEFAULT_RESOURCE.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resource,
            timeout: Duration::from_secs(parse_or(
                &get,
                "POKEDEX_TIMEOUT_SECS",
                pokedex_api::DEFAULT_TIMEOUT.as_secs(),
            )),
            fresh_ttl: Duration::from_secs(parse_or(&get, "POKEDEX_FRESH_SECS", DEFAULT_FRESH_SECS)),
            evict_ttl: Duration::from_secs(parse_or(&get, "POKEDEX_EVICT_SECS", DEFAULT_EVICT_SECS)),
            retry: RetryConfig::from_vars(&get),
        }
    }

    /// Upstream client with the fetch pipeline configured from these settings.
    pub fn api_client(&self) -> pokedex_api::Client {
        pokedex_api::Client::with_base_url(&self.base_url)
            .with_resource(&self.resource)
            .with_timeout(self.timeout)
    }

    pub fn cache<V: Clone>(&self) -> MemoryCache<V> {
        MemoryCache::new(self.fresh_ttl, self.evict_ttl)
    }
}

/// Parses `key` with `get`, falling back to `default` when the variable is
/// missing or unparsable.
pub(crate) fn parse_or<T: std::str::FromStr>(
    get: impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    get(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
