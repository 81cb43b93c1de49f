//! Lookup against a running `pokedex serve` instance instead of PokéAPI.

use std::time::Duration;

use async_trait::async_trait;

use crate::client::LookupService;
use crate::error::PokedexError;
use crate::handler::Envelope;
use crate::transform::DisplayRecord;

/// Message used when a failed response carries no `error` text.
pub const REMOTE_FALLBACK_MESSAGE: &str = "Failed to fetch Pokémon";

pub struct RemoteLookup {
    server_url: String,
    http: reqwest::Client,
}

impl RemoteLookup {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, PokedexError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PokedexError::Remote {
                status: None,
                message: e.to_string(),
            })?;
        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl LookupService for RemoteLookup {
    async fn lookup(&self, query: &str) -> Result<DisplayRecord, PokedexError> {
        let url = format!(
            "{}/api/pokemon?q={}",
            self.server_url,
            urlencoding::encode(query)
        );

        let resp = self.http.get(&url).send().await.map_err(|e| {
            tracing::debug!("Remote lookup failed: {}", e);
            PokedexError::Remote {
                status: None,
                message: format!("fetch failed: {}", e),
            }
        })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| PokedexError::Remote {
            status: None,
            message: format!("fetch failed: {}", e),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<Envelope>(&body) {
                Ok(Envelope::Failure { error, .. }) if !error.is_empty() => error,
                _ => REMOTE_FALLBACK_MESSAGE.to_string(),
            };
            return Err(PokedexError::Remote {
                status: Some(status.as_u16()),
                message,
            });
        }

        match serde_json::from_str::<Envelope>(&body)? {
            Envelope::Success { data, .. } => Ok(data),
            Envelope::Failure { error, .. } => Err(PokedexError::Remote {
                status: Some(status.as_u16()),
                message: error,
            }),
        }
    }
}
