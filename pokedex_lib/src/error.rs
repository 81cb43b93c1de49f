//! Error types for the library layer.

use std::fmt;

use crate::transform::ShapeError;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding record shape, serialization, and input validation failures.
#[derive(Debug)]
pub enum PokedexError {
    /// An error from the upstream pipeline. Already translated when it came
    /// through [`pokedex_api::Client`].
    Api(pokedex_api::Error),
    /// The upstream document did not have the expected structure.
    Shape(ShapeError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// A remote lookup server failed. `status` is `None` when no response
    /// arrived at all.
    Remote {
        status: Option<u16>,
        message: String,
    },
}

impl PokedexError {
    /// Text suitable for showing to an end user.
    ///
    /// Upstream, shape, and remote failures are shown as-is since they are
    /// already user-facing; the others carry a category prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.to_string(),
            Self::Shape(e) => e.to_string(),
            Self::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for PokedexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Shape(e) => write!(f, "{}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Remote {
                status: Some(status),
                message,
            } => write!(f, "Remote error ({}): {}", status, message),
            Self::Remote { message, .. } => write!(f, "Remote error: {}", message),
        }
    }
}

impl std::error::Error for PokedexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Shape(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<pokedex_api::Error> for PokedexError {
    fn from(e: pokedex_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ShapeError> for PokedexError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<serde_json::Error> for PokedexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
