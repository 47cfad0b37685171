//! Offline-first joke catalog.
//!
//! A remote JokeAPI client, a SQLite-backed local store, and the synchronizer
//! that reconciles the two into the category view consumed by presentation.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod store;

pub use api::{CatalogSource, JokeApiClient};
pub use catalog::{CatalogSynchronizer, Category, CategoryView, StoredJoke, SyncState};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use store::CatalogStore;
