//! Error types for the API client and its middleware pipeline.

/// User-facing text for a transport failure.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to Pokémon API. Please check your internet connection.";
/// User-facing text for an upstream 404.
pub const NOT_FOUND_MESSAGE: &str = "Pokémon not found. Please try a different search term.";
/// User-facing text for an upstream 500.
pub const UNAVAILABLE_MESSAGE: &str =
    "Pokémon API is currently unavailable. Please try again later.";
/// User-facing text for a failure that carried no message at all.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Errors that can occur when calling an operation.
///
/// The first group are raw failures produced where the request is made. The
/// second group are the translated, user-facing failures produced by
/// [`ErrorTranslator`](crate::middleware::ErrorTranslator).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The transport failed before a response arrived (DNS, refused, timeout).
    #[error("fetch failed: {0}")]
    Transport(String),
    /// The upstream answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },
    /// The request URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The response body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Decode(String),
    /// An arbitrary failure with message text.
    #[error("{0}")]
    Message(String),
    /// A failure value that carries no message text.
    #[error("operation failed with a non-error value: {0}")]
    Opaque(serde_json::Value),

    #[error("Unable to connect to Pokémon API. Please check your internet connection.")]
    Connectivity,
    #[error("Pokémon not found. Please try a different search term.")]
    NotFound,
    #[error("Pokémon API is currently unavailable. Please try again later.")]
    UpstreamUnavailable,
    #[error("Search failed: {0}")]
    SearchFailed(String),
    #[error("An unexpected error occurred. Please try again.")]
    Unexpected,
}

impl Error {
    /// Message text of this failure, or `None` when the failure is not
    /// error-like (an [`Error::Opaque`] value).
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Opaque(_) => None,
            other => Some(other.to_string()),
        }
    }
}
