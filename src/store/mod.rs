//! SQLite-backed persistence for categories and jokes.
//!
//! The store owns durable state and nothing else: schema creation, idempotent
//! writes, queries, and the full wipes that precede a resynchronization.

pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::api::types::ApiJoke;
use crate::catalog::types::{Category, StoredJoke};
use crate::error::Result;

/// Durable store for the joke catalog.
///
/// Holds a single SQLite connection behind a mutex; constructed once and
/// shared by reference for the life of the process.
pub struct CatalogStore {
  conn: Mutex<Connection>,
}

impl CatalogStore {
  /// Open or create the store at the default location.
  pub fn open_default() -> Result<Self> {
    Self::open(&Self::default_path()?)
  }

  /// Open or create the store at the given path, creating parent directories
  /// and running migrations. Safe to call on an existing database.
  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// In-memory store, used by tests.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| std::io::Error::other("could not determine data directory"))?;

    Ok(data_dir.join("jokebox").join("catalog.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    self.lock().execute_batch(schema::SCHEMA)?;
    Ok(())
  }

  fn lock(&self) -> MutexGuard<'_, Connection> {
    // A poisoned lock means a panic mid-statement; the connection itself is
    // still usable.
    self.conn.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Upsert categories by name, last write wins on alias.
  ///
  /// Rows absent from the input are left alone; a full wipe is a separate
  /// explicit step.
  pub fn replace_categories(&self, categories: &[Category]) -> Result<()> {
    let mut conn = self.lock();
    let tx = conn.transaction()?;

    for category in categories {
      tx.execute(
        "INSERT OR REPLACE INTO categories (name, alias) VALUES (?1, ?2)",
        params![category.name, category.alias],
      )?;
    }

    tx.commit()?;
    Ok(())
  }

  /// Insert-or-replace each joke by id, stamping `is_custom` and `inserted_at`.
  /// One transaction per call.
  pub fn upsert_jokes(&self, jokes: &[ApiJoke], is_custom: bool) -> Result<()> {
    let mut conn = self.lock();
    let tx = conn.transaction()?;

    // Stamps stay strictly increasing even when batches land within the same
    // microsecond, so batch order survives the ascending sort.
    let newest: i64 = tx.query_row("SELECT COALESCE(MAX(inserted_at), 0) FROM jokes", [], |row| {
      row.get(0)
    })?;
    let base = Utc::now().timestamp_micros().max(newest + 1);

    for (offset, joke) in jokes.iter().enumerate() {
      tx.execute(
        "INSERT OR REPLACE INTO jokes (id, category, joke_text, is_custom, inserted_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![joke.id, joke.category, joke.joke, is_custom, base + offset as i64],
      )?;
    }

    tx.commit()?;
    debug!(count = jokes.len(), is_custom, "persisted jokes");
    Ok(())
  }

  /// List categories in the order the remote catalog delivered them.
  pub fn list_categories(&self) -> Result<Vec<Category>> {
    let conn = self.lock();
    let mut stmt = conn.prepare("SELECT name, alias FROM categories ORDER BY id")?;

    let categories = stmt
      .query_map([], |row| {
        Ok(Category {
          name: row.get(0)?,
          alias: row.get(1)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(categories)
  }

  /// List one category's jokes in insertion order.
  pub fn list_jokes(&self, category: &str) -> Result<Vec<StoredJoke>> {
    let conn = self.lock();
    let mut stmt = conn.prepare(
      "SELECT id, category, joke_text, is_custom, inserted_at FROM jokes
       WHERE category = ?1 ORDER BY inserted_at ASC",
    )?;

    let jokes = stmt
      .query_map([category], |row| {
        Ok(StoredJoke {
          id: row.get(0)?,
          category: row.get(1)?,
          text: row.get(2)?,
          is_custom: row.get(3)?,
          inserted_at: row.get(4)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(jokes)
  }

  /// Delete every joke row. First step of a full resynchronization.
  pub fn clear_jokes(&self) -> Result<()> {
    self.lock().execute("DELETE FROM jokes", [])?;
    Ok(())
  }

  /// Delete every category row. First step of a full resynchronization.
  pub fn clear_categories(&self) -> Result<()> {
    self.lock().execute("DELETE FROM categories", [])?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> CatalogStore {
    CatalogStore::open_in_memory().unwrap()
  }

  fn joke(id: i64, category: &str, text: &str) -> ApiJoke {
    ApiJoke {
      id,
      category: category.to_string(),
      joke_type: "single".to_string(),
      joke: text.to_string(),
      flags: Default::default(),
      safe: true,
      lang: "en".to_string(),
    }
  }

  #[test]
  fn test_upsert_same_id_replaces_row() {
    let store = store();

    store.upsert_jokes(&[joke(1, "Programming", "first")], false).unwrap();
    store.upsert_jokes(&[joke(1, "Programming", "second")], true).unwrap();

    let jokes = store.list_jokes("Programming").unwrap();
    assert_eq!(jokes.len(), 1);
    assert_eq!(jokes[0].text, "second");
    assert!(jokes[0].is_custom);
  }

  #[test]
  fn test_upsert_same_id_across_categories_keeps_one_row() {
    let store = store();

    store.upsert_jokes(&[joke(1, "Programming", "first")], false).unwrap();
    store.upsert_jokes(&[joke(1, "Dark", "moved")], false).unwrap();

    assert!(store.list_jokes("Programming").unwrap().is_empty());
    assert_eq!(store.list_jokes("Dark").unwrap().len(), 1);
  }

  #[test]
  fn test_replace_categories_updates_alias_without_duplicating() {
    let store = store();

    store
      .replace_categories(&[Category {
        name: "Misc".to_string(),
        alias: None,
      }])
      .unwrap();
    store
      .replace_categories(&[Category {
        name: "Misc".to_string(),
        alias: Some("Miscellaneous".to_string()),
      }])
      .unwrap();

    let categories = store.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].alias.as_deref(), Some("Miscellaneous"));
  }

  #[test]
  fn test_jokes_keep_insertion_order() {
    let store = store();

    // Descending ids on purpose: insertion order must win over id order.
    store
      .upsert_jokes(&[joke(10, "Misc", "a"), joke(5, "Misc", "b")], false)
      .unwrap();
    store.upsert_jokes(&[joke(1, "Misc", "c")], true).unwrap();

    let texts: Vec<_> = store
      .list_jokes("Misc")
      .unwrap()
      .into_iter()
      .map(|j| j.text)
      .collect();
    assert_eq!(texts, ["a", "b", "c"]);
  }

  #[test]
  fn test_clear_wipes_both_tables() {
    let store = store();

    store
      .replace_categories(&[Category {
        name: "Dark".to_string(),
        alias: None,
      }])
      .unwrap();
    store.upsert_jokes(&[joke(7, "Dark", "gone soon")], false).unwrap();

    store.clear_jokes().unwrap();
    store.clear_categories().unwrap();

    assert!(store.list_categories().unwrap().is_empty());
    assert!(store.list_jokes("Dark").unwrap().is_empty());
  }

  #[test]
  fn test_reopen_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.db");

    {
      let store = CatalogStore::open(&path).unwrap();
      store.upsert_jokes(&[joke(3, "Pun", "still here")], false).unwrap();
    }

    let store = CatalogStore::open(&path).unwrap();
    let jokes = store.list_jokes("Pun").unwrap();
    assert_eq!(jokes.len(), 1);
    assert_eq!(jokes[0].text, "still here");
  }
}
