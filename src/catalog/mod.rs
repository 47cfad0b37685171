//! Catalog domain: category/joke types and the synchronization core.

pub mod sync;
pub mod types;

pub use sync::{CatalogSynchronizer, SyncState};
pub use types::{Category, CategoryView, StoredJoke};
