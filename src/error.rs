use thiserror::Error;

/// Error taxonomy for the catalog core.
#[derive(Error, Debug)]
pub enum CatalogError {
  /// Remote service unreachable or returned a non-success response.
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  /// Local persistence failed.
  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A caller asked for a category the catalog does not know about.
  #[error("unknown category: {0}")]
  UnknownCategory(String),

  /// A synchronization aborted partway through.
  #[error("fetch failed: {0}")]
  Fetch(String),

  /// Bad configuration, e.g. a malformed API base URL.
  #[error("invalid configuration: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
