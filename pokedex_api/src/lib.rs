//! PokéAPI client built from composable request middleware.
//!
//! Requests go through [`pipeline::assemble`]: base URL injection, logging
//! and error translation layered around the [`HttpFetch`] primitive.

mod client;
mod errors;
pub mod middleware;
pub mod pipeline;
pub mod types;
pub use self::client::{Client, HttpFetch, DEFAULT_BASE_URL, DEFAULT_RESOURCE, DEFAULT_TIMEOUT};
pub use self::errors::{
    Error, CONNECTIVITY_MESSAGE, NOT_FOUND_MESSAGE, UNAVAILABLE_MESSAGE, UNEXPECTED_MESSAGE,
};
pub use self::middleware::{compose, BoxedOperation, Middleware, Operation};
