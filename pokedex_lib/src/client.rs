//! Caching and retrying lookup client: the query state a front end binds to.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{Lookup, MemoryCache};
use crate::config::parse_or;
use crate::error::PokedexError;
use crate::transform::DisplayRecord;
use crate::validation::{is_blank, validate_query};

/// Something that can resolve one query to a display record: the local
/// request handler, or a remote server speaking the same envelope.
#[async_trait]
pub trait LookupService: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<DisplayRecord, PokedexError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_retries: parse_or(&get, "POKEDEX_RETRY_MAX", defaults.max_retries),
            base_delay_ms: parse_or(&get, "POKEDEX_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: parse_or(&get, "POKEDEX_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based):
    /// `min(base * 2^(attempt - 1), max)`.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let delay = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// What a front end shows for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub data: Option<DisplayRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryState {
    /// Nothing requested yet.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.data.is_none() && !self.is_loading && self.error.is_none()
    }
}

/// Lookup client that adds per-query caching and retries on top of a
/// [`LookupService`].
///
/// Fresh cache hits bypass the service entirely. Stale hits trigger a
/// refetch and fall back to the stale record if that fails. Failed fetches
/// are retried with exponential backoff.
pub struct CachedClient {
    service: Arc<dyn LookupService>,
    cache: MemoryCache<DisplayRecord>,
    retry: RetryConfig,
}

impl CachedClient {
    /// Creates a client whose retry policy comes from the environment.
    pub fn new(service: Arc<dyn LookupService>, cache: MemoryCache<DisplayRecord>) -> Self {
        Self {
            service,
            cache,
            retry: RetryConfig::from_env(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// State before the query resolves, as far as the cache can tell.
    ///
    /// Blank queries are idle. A fresh entry is final; a stale entry is shown
    /// while loading; anything else is loading with no data.
    pub fn peek(&self, query: &str) -> QueryState {
        if is_blank(query) {
            return QueryState::idle();
        }
        let Ok(key) = validate_query(query) else {
            return QueryState {
                is_loading: true,
                ..QueryState::default()
            };
        };
        match self.cache.get(&key) {
            Lookup::Fresh(record) => QueryState {
                data: Some(record),
                ..QueryState::default()
            },
            Lookup::Stale(record) => QueryState {
                data: Some(record),
                is_loading: true,
                error: None,
            },
            Lookup::Miss => QueryState {
                is_loading: true,
                ..QueryState::default()
            },
        }
    }

    /// Resolves `query` to its final state. Blank queries are skipped and
    /// stay idle.
    pub async fn search(&self, query: &str) -> QueryState {
        if is_blank(query) {
            return QueryState::idle();
        }
        match self.fetch(query).await {
            Ok(record) => QueryState {
                data: Some(record),
                ..QueryState::default()
            },
            Err(err) => QueryState {
                error: Some(err.user_message()),
                ..QueryState::default()
            },
        }
    }

    /// Fetches one record, returning cached results when available.
    pub async fn fetch(&self, query: &str) -> Result<DisplayRecord, PokedexError> {
        let key = validate_query(query)?;

        match self.cache.get(&key) {
            Lookup::Fresh(record) => {
                tracing::debug!("Cache hit for {}", key);
                Ok(record)
            }
            Lookup::Stale(record) => match self.load(&key).await {
                Ok(fresh) => Ok(fresh),
                Err(err) => {
                    tracing::warn!("Refetch of {} failed, serving stale data: {}", key, err);
                    Ok(record)
                }
            },
            Lookup::Miss => self.load(&key).await,
        }
    }

    async fn load(&self, key: &str) -> Result<DisplayRecord, PokedexError> {
        let record = self
            .with_retry(key, || self.service.lookup(key))
            .await?;
        self.cache.set(key.to_string(), record.clone());
        Ok(record)
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, PokedexError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PokedexError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} lookup failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Absence and bad input are answers, not transient failures.
fn is_retryable(err: &PokedexError) -> bool {
    match err {
        PokedexError::Api(api_err) => !matches!(api_err, pokedex_api::Error::NotFound),
        PokedexError::Remote { status, message } => {
            message != pokedex_api::NOT_FOUND_MESSAGE && status.map_or(true, |s| s >= 500 || s == 429)
        }
        _ => false,
    }
}
