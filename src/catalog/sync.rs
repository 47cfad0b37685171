//! Catalog synchronization core.
//!
//! Decides full-refresh vs cache-read on startup, runs full resynchronizations
//! (wipe + refetch + persist), appends jokes incrementally for one category,
//! and owns the in-memory view list consumed by presentation.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::client::{CatalogSource, JOKES_PER_FETCH};
use crate::api::types::ApiCategoriesResponse;
use crate::catalog::types::{Category, CategoryView};
use crate::error::{CatalogError, Result};
use crate::store::CatalogStore;

/// Remote wildcard category. It expands to every other category server-side
/// and is never persisted as a group of its own.
const WILDCARD_CATEGORY: &str = "Any";

/// A category holding more than one fetch page's worth of jokes is exhausted.
const EXHAUSTED_AFTER: usize = JOKES_PER_FETCH as usize;

/// Synchronization lifecycle of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
  /// No operation has run yet.
  Idle,
  /// First load (or post-error reload) in progress.
  Loading,
  /// The view reflects the store.
  Ready,
  /// The last operation failed; holds the single user-visible message.
  Error(String),
}

/// Reconciles the remote joke service with the local store and exposes a
/// consistent in-memory view.
///
/// Operations take `&mut self` and are serialized by construction; an
/// in-flight flag additionally turns overlapping triggers into no-ops, so a
/// resync can never wipe data out from under a pending append.
pub struct CatalogSynchronizer<C> {
  client: C,
  store: CatalogStore,
  views: Vec<CategoryView>,
  state: SyncState,
  refreshing: bool,
  in_flight: bool,
}

impl<C: CatalogSource> CatalogSynchronizer<C> {
  pub fn new(client: C, store: CatalogStore) -> Self {
    Self {
      client,
      store,
      views: Vec::new(),
      state: SyncState::Idle,
      refreshing: false,
      in_flight: false,
    }
  }

  // ==========================================================================
  // Presentation-facing output model
  // ==========================================================================

  /// The category views, in remote catalog order.
  pub fn views(&self) -> &[CategoryView] {
    &self.views
  }

  pub fn state(&self) -> &SyncState {
    &self.state
  }

  pub fn loading(&self) -> bool {
    matches!(self.state, SyncState::Loading)
  }

  /// True while an explicit refresh runs over an already-`Ready` catalog.
  pub fn refreshing(&self) -> bool {
    self.refreshing
  }

  /// True while any synchronization operation is pending.
  pub fn busy(&self) -> bool {
    self.in_flight
  }

  pub fn error(&self) -> Option<&str> {
    match &self.state {
      SyncState::Error(e) => Some(e),
      _ => None,
    }
  }

  // ==========================================================================
  // Entry points
  // ==========================================================================

  /// Startup protocol: serve from cache when it already has categories,
  /// otherwise run a full resynchronization.
  pub async fn start(&mut self) -> Result<()> {
    if !self.try_begin() {
      return Ok(());
    }
    self.state = SyncState::Loading;

    let result = match self.store.list_categories() {
      Ok(categories) if !categories.is_empty() => {
        self.cache_load();
        Ok(())
      }
      Ok(_) => self.full_resync().await,
      Err(e) => {
        warn!(error = %e, "category listing failed, falling back to full resync");
        self.full_resync().await
      }
    };

    self.finish(result)
  }

  /// Explicit user refresh: full wipe-and-refetch.
  ///
  /// While `Ready` the existing view keeps rendering and only the
  /// `refreshing` flag is raised; any previous error is cleared up front.
  pub async fn refresh(&mut self) -> Result<()> {
    if !self.try_begin() {
      return Ok(());
    }
    if self.state == SyncState::Ready {
      self.refreshing = true;
    } else {
      self.state = SyncState::Loading;
    }

    let result = self.full_resync().await;
    self.finish(result)
  }

  /// Fetch one more page of jokes for a single category and merge it in.
  ///
  /// Zero remote results mean "no more available" and leave the view alone.
  /// An unknown name is a caller bug and touches nothing.
  pub async fn add_more(&mut self, category_name: &str) -> Result<()> {
    if !self.views.iter().any(|v| v.name == category_name) {
      return Err(CatalogError::UnknownCategory(category_name.to_string()));
    }
    if !self.try_begin() {
      return Ok(());
    }

    let jokes = self
      .client
      .fetch_jokes(category_name, JOKES_PER_FETCH, true)
      .await;

    let result = if jokes.is_empty() {
      debug!(category = category_name, "no additional jokes available");
      Ok(())
    } else {
      match self.store.upsert_jokes(&jokes, true) {
        Ok(()) => {
          self.cache_load();
          Ok(())
        }
        Err(e) => Err(e),
      }
    };

    self.finish(result)
  }

  // ==========================================================================
  // Internals
  // ==========================================================================

  fn try_begin(&mut self) -> bool {
    if self.in_flight {
      debug!("catalog operation already in flight, ignoring trigger");
      return false;
    }
    self.in_flight = true;
    true
  }

  fn finish(&mut self, result: Result<()>) -> Result<()> {
    self.in_flight = false;
    self.refreshing = false;
    if let Err(e) = &result {
      self.state = SyncState::Error(e.to_string());
    }
    result
  }

  /// Wipe, refetch, persist. A failure aborts the remaining work and may
  /// leave the catalog empty until the next successful resync.
  async fn full_resync(&mut self) -> Result<()> {
    // The wipe must complete before any write below.
    self.store.clear_jokes()?;
    self.store.clear_categories()?;

    let remote = self.client.fetch_categories().await?;
    let categories = resolve_categories(&remote);
    self.store.replace_categories(&categories)?;

    // Categories are independent; fetch their first page concurrently.
    let client = &self.client;
    let fetches = categories.iter().map(|category| {
      let key = category.query_key().to_string();
      async move { client.fetch_jokes(&key, JOKES_PER_FETCH, false).await }
    });
    let batches = join_all(fetches).await;

    for (category, jokes) in categories.iter().zip(batches) {
      // fetch_jokes folds its failures into an empty batch; the category
      // keeps its (empty) view and the resync moves on.
      if jokes.is_empty() {
        debug!(category = %category.name, "no jokes received, category starts empty");
        continue;
      }
      self.store.upsert_jokes(&jokes, false)?;
    }

    self.cache_load();
    Ok(())
  }

  /// Rebuild the view list strictly from the store. No network access.
  ///
  /// Read failures degrade to an empty result so the catalog presents
  /// "no data" instead of crashing the view-building step.
  fn cache_load(&mut self) {
    let categories = match self.store.list_categories() {
      Ok(categories) => categories,
      Err(e) => {
        warn!(error = %e, "category listing failed, presenting an empty catalog");
        Vec::new()
      }
    };

    let mut views = Vec::with_capacity(categories.len());
    for category in categories {
      let jokes = match self.store.list_jokes(&category.name) {
        Ok(jokes) => jokes,
        Err(e) => {
          warn!(category = %category.name, error = %e, "joke listing failed, presenting it empty");
          Vec::new()
        }
      };
      views.push(CategoryView {
        exhausted: jokes.len() > EXHAUSTED_AFTER,
        name: category.name,
        alias: category.alias,
        jokes,
      });
    }

    self.views = views;
    self.state = SyncState::Ready;
  }
}

/// Build category records from the remote listing: drop the wildcard and
/// attach the alias whose `resolved` entry points at the category.
fn resolve_categories(remote: &ApiCategoriesResponse) -> Vec<Category> {
  remote
    .categories
    .iter()
    .filter(|name| name.as_str() != WILDCARD_CATEGORY)
    .map(|name| {
      let alias = remote
        .category_aliases
        .iter()
        .find(|a| a.resolved == *name)
        .map(|a| a.alias.clone());
      Category {
        name: name.clone(),
        alias,
      }
    })
    .collect()
}
