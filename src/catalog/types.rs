/// A named grouping of jokes.
///
/// `alias`, when present, is the key the remote service expects in place of
/// `name`; `name` stays the storage key either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
  pub name: String,
  pub alias: Option<String>,
}

impl Category {
  /// Key used when querying the remote service: the alias if one exists.
  pub fn query_key(&self) -> &str {
    self.alias.as_deref().unwrap_or(&self.name)
  }
}

/// A joke row as persisted in the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredJoke {
  pub id: i64,
  pub category: String,
  pub text: String,
  /// True when the joke arrived via "fetch more" rather than the initial bulk fetch.
  pub is_custom: bool,
  /// Microsecond UTC timestamp; jokes within a category sort by it, ascending.
  pub inserted_at: i64,
}

/// In-memory projection of one category and its cached jokes.
///
/// Built by the synchronizer strictly from the store; presentation only reads it.
#[derive(Debug, Clone)]
pub struct CategoryView {
  pub name: String,
  pub alias: Option<String>,
  pub jokes: Vec<StoredJoke>,
  /// True once the category holds more than one fetch page's worth of jokes,
  /// signaling that the "fetch more" affordance should be hidden.
  pub exhausted: bool,
}
