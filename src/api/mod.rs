//! Remote joke service: wire types and the HTTP client.

pub mod client;
pub mod types;

pub use client::{CatalogSource, JokeApiClient, JOKES_PER_FETCH};
