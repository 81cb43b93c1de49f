//! Library layer for the Pokédex: display records, the lookup handler,
//! and a cached, retrying lookup client.
//!
//! Wraps the `pokedex_api` crate's fetch pipeline with the record
//! transformer, query validation, and an in-memory cache with freshness
//! and eviction windows.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod remote;
pub mod transform;
pub mod validation;

pub use pokedex_api;
pub use pokedex_api::types;

pub use client::{CachedClient, LookupService, QueryState, RetryConfig};
pub use config::PokedexConfig;
pub use error::PokedexError;
pub use handler::{Envelope, HandlerResponse, LookupHandler, MISSING_QUERY_MESSAGE};
pub use remote::RemoteLookup;
pub use transform::{
    filter_by_category, sort_by_total, top_by_total, transform, transform_record, DisplayRecord,
    Metrics, ShapeError,
};
