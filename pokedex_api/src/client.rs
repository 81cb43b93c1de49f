//! HTTP client for PokéAPI.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::{
    middleware::{boxed, BoxedOperation, LogSink, Operation, TracingSink},
    pipeline,
    types::{FetchArgs, FetchResponse, RequestInit, Resource},
    Error,
};

/// Production PokéAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
/// Resource collection holding one document per Pokémon.
pub const DEFAULT_RESOURCE: &str = "pokemon";
/// Per-request timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

/// The network primitive: performs one request and returns the body of a
/// 2xx response.
///
/// Each call builds a fresh `reqwest::Client`, so no connection state is
/// shared between calls. Transport failures become [`Error::Transport`]
/// and non-2xx statuses [`Error::HttpStatus`].
#[derive(Debug, Clone)]
pub struct HttpFetch {
    timeout: Duration,
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpFetch {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Operation<FetchArgs> for HttpFetch {
    type Output = FetchResponse;

    async fn call(&self, args: FetchArgs) -> Result<FetchResponse, Error> {
        let (resource, init) = args;
        let (url, mut method, mut headers) = match resource {
            Resource::Url(url) => (url, "GET".to_string(), Default::default()),
            Resource::Request(request) => (request.url, request.method, request.headers),
        };
        if let Some(init) = init {
            if let Some(m) = init.method {
                method = m;
            }
            headers.extend(init.headers);
        }

        let url = Url::parse(&url).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{} ({})", url, e))
        })?;
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| Error::Message(format!("Invalid HTTP method: {}", method)))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e.to_string())
            })?;

        let mut request = client.request(method, url.clone());
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let resp = request.send().await.map_err(|e| {
            tracing::debug!("Failed to get resource: {}", e);
            Error::Transport(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::debug!("Failed to read response body: {}", e);
            Error::Transport(e.to_string())
        })?;

        if !status.is_success() {
            tracing::debug!(
                "Request failed with status {}: {}",
                status,
                crate::types::truncate_body(&body)
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(FetchResponse {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        })
    }
}

/// PokéAPI client. Every request runs through the middleware stack built
/// by [`pipeline::assemble`].
pub struct Client {
    base_api_url: String,
    resource: String,
    timeout: Duration,
    sink: Arc<dyn LogSink>,
    fetch: BoxedOperation<FetchArgs, FetchResponse>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production PokéAPI.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::build(
            base_url.trim_end_matches('/'),
            DEFAULT_RESOURCE,
            DEFAULT_TIMEOUT,
            Arc::new(TracingSink),
        )
    }

    /// Uses another resource collection, e.g. `pokemon-form`.
    pub fn with_resource(self, resource: &str) -> Self {
        Self::build(
            &self.base_api_url,
            resource.trim_matches('/'),
            self.timeout,
            self.sink,
        )
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self::build(&self.base_api_url, &self.resource, timeout, self.sink)
    }

    /// Sends the pipeline's log events to `sink` instead of `tracing`.
    pub fn with_sink(self, sink: Arc<dyn LogSink>) -> Self {
        Self::build(&self.base_api_url, &self.resource, self.timeout, sink)
    }

    fn build(base_url: &str, resource: &str, timeout: Duration, sink: Arc<dyn LogSink>) -> Self {
        let fetch: BoxedOperation<FetchArgs, FetchResponse> = pipeline::assemble(
            boxed(HttpFetch::new(timeout)),
            base_url,
            sink.clone(),
        );
        Self {
            base_api_url: base_url.to_string(),
            resource: resource.to_string(),
            timeout,
            sink,
            fetch,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// Fetches the raw document for one Pokémon by name or national dex id.
    ///
    /// `name_or_id` is lower-cased and used as a single path segment; callers
    /// are expected to have percent-encoded anything unsafe.
    pub async fn get_pokemon(&self, name_or_id: &str) -> Result<serde_json::Value, Error> {
        let path = format!("/{}/{}", self.resource, name_or_id.to_lowercase());
        let init = RequestInit::default()
            .with_method("GET")
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json");

        let response = self.fetch.call((Resource::Url(path), Some(init))).await?;
        response.json()
    }
}
