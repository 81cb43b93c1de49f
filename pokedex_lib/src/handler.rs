//! The lookup endpoint: validates the query, runs the upstream fetch
//! pipeline, and wraps the outcome in a JSON envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::LookupService;
use crate::config::PokedexConfig;
use crate::error::PokedexError;
use crate::transform::{transform, DisplayRecord};
use crate::validation::{encode_segment, is_blank, validate_query};

pub const MISSING_QUERY_MESSAGE: &str = "Search term is required";

/// Response body of the lookup endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Envelope {
    Success {
        data: DisplayRecord,
        success: bool,
    },
    Failure {
        error: String,
        #[serde(default)]
        success: bool,
    },
}

impl Envelope {
    pub fn ok(data: DisplayRecord) -> Self {
        Self::Success {
            data,
            success: true,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            success: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// HTTP status plus envelope, independent of any server framework.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Envelope,
}

impl HandlerResponse {
    fn failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            body: Envelope::failure(error),
        }
    }
}

/// Server-side lookup handler over the upstream client.
pub struct LookupHandler {
    client: pokedex_api::Client,
}

impl LookupHandler {
    pub fn new(client: pokedex_api::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &PokedexConfig) -> Self {
        Self::new(config.api_client())
    }

    /// Answers one lookup request. Never fails: every outcome is turned into
    /// a status and envelope.
    ///
    /// - missing or blank query: 400, `Search term is required`
    /// - query rejected by validation: 400
    /// - upstream or transform failure: 500 with the user-facing message
    pub async fn handle(&self, query: Option<&str>) -> HandlerResponse {
        let Some(query) = query.filter(|q| !is_blank(q)) else {
            return HandlerResponse::failure(400, MISSING_QUERY_MESSAGE);
        };

        match self.fetch_record(query).await {
            Ok(record) => HandlerResponse {
                status: 200,
                body: Envelope::ok(record),
            },
            Err(err @ PokedexError::InvalidInput(_)) => {
                HandlerResponse::failure(400, err.to_string())
            }
            Err(err) => {
                tracing::error!("Pokémon API error: {}", err);
                HandlerResponse::failure(500, err.user_message())
            }
        }
    }

    /// Fetches and transforms one record.
    pub async fn fetch_record(&self, query: &str) -> Result<DisplayRecord, PokedexError> {
        let query = validate_query(query)?;
        let raw = self.client.get_pokemon(&encode_segment(&query)).await?;
        Ok(transform(&raw)?)
    }
}

#[async_trait]
impl LookupService for LookupHandler {
    async fn lookup(&self, query: &str) -> Result<DisplayRecord, PokedexError> {
        self.fetch_record(query).await
    }
}
