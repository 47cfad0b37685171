use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::{ApiCategoriesResponse, ApiJoke, ApiJokesResponse};
use crate::error::{CatalogError, Result};

/// Jokes requested per fetch. One "page" of the catalog.
pub const JOKES_PER_FETCH: u8 = 2;

/// HTTP request timeout in seconds.
/// The joke service answers fast; anything slower should fail over to cache.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Alternate remote id window requested on repeat fetches, so the service
/// does not just re-return the first page. Its bounds are the service's
/// contract, not ours.
const PAGED_ID_RANGE: &str = "2-100";

/// Remote source of categories and jokes.
///
/// This is the synchronizer's seam: production code talks to JokeAPI over
/// HTTP, tests substitute a scripted source.
pub trait CatalogSource {
  /// Fetch the remote category list with its alias table.
  /// Transport failures and non-2xx responses are errors; no partial success.
  fn fetch_categories(&self) -> impl Future<Output = Result<ApiCategoriesResponse>> + Send;

  /// Fetch `amount` jokes for one category key.
  ///
  /// Returns an empty list on any failure: one category running dry must not
  /// take down the whole catalog.
  fn fetch_jokes(
    &self,
    category_key: &str,
    amount: u8,
    paged_range: bool,
  ) -> impl Future<Output = Vec<ApiJoke>> + Send;
}

/// HTTP client for the JokeAPI service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct JokeApiClient {
  http: Client,
  base_url: Url,
}

impl JokeApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let mut base = Url::parse(base_url)
      .map_err(|e| CatalogError::Config(format!("invalid API base URL {base_url}: {e}")))?;

    // A trailing slash keeps Url::join from swallowing the last path segment.
    if !base.path().ends_with('/') {
      base.set_path(&format!("{}/", base.path()));
    }

    let http = Client::builder()
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()?;

    Ok(Self {
      http,
      base_url: base,
    })
  }

  fn categories_url(&self) -> Result<Url> {
    self
      .base_url
      .join("categories?format=json")
      .map_err(|e| CatalogError::Config(format!("bad categories endpoint: {e}")))
  }

  fn joke_url(&self, category_key: &str, amount: u8, paged_range: bool) -> Result<Url> {
    let mut url = self
      .base_url
      .join(&format!("joke/{category_key}"))
      .map_err(|e| CatalogError::Config(format!("bad joke endpoint: {e}")))?;

    {
      let mut pairs = url.query_pairs_mut();
      pairs
        .append_pair("type", "single")
        .append_pair("amount", &amount.to_string());
      if paged_range {
        pairs.append_pair("idRange", PAGED_ID_RANGE);
      }
    }

    Ok(url)
  }

  async fn request_jokes(
    &self,
    category_key: &str,
    amount: u8,
    paged_range: bool,
  ) -> Result<Vec<ApiJoke>> {
    let url = self.joke_url(category_key, amount, paged_range)?;
    debug!(%url, "fetching jokes");

    let response: ApiJokesResponse = self
      .http
      .get(url)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;

    Ok(response.jokes)
  }
}

impl CatalogSource for JokeApiClient {
  async fn fetch_categories(&self) -> Result<ApiCategoriesResponse> {
    let url = self.categories_url()?;
    debug!(%url, "fetching remote categories");

    let response = self.http.get(url).send().await?.error_for_status()?;

    Ok(response.json().await?)
  }

  async fn fetch_jokes(&self, category_key: &str, amount: u8, paged_range: bool) -> Vec<ApiJoke> {
    match self.request_jokes(category_key, amount, paged_range).await {
      Ok(jokes) => jokes,
      Err(e) => {
        warn!(category = category_key, error = %e, "joke fetch failed, returning no jokes");
        Vec::new()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> JokeApiClient {
    JokeApiClient::new("https://v2.jokeapi.dev").unwrap()
  }

  #[test]
  fn test_categories_url() {
    let url = client().categories_url().unwrap();
    assert_eq!(url.as_str(), "https://v2.jokeapi.dev/categories?format=json");
  }

  #[test]
  fn test_joke_url_uses_single_type_and_amount() {
    let url = client().joke_url("Programming", 2, false).unwrap();
    assert_eq!(url.path(), "/joke/Programming");
    assert_eq!(url.query(), Some("type=single&amount=2"));
  }

  #[test]
  fn test_joke_url_adds_paged_id_range() {
    let url = client().joke_url("Dark", 2, true).unwrap();
    assert_eq!(url.query(), Some("type=single&amount=2&idRange=2-100"));
  }

  #[test]
  fn test_base_url_with_path_keeps_segment() {
    let client = JokeApiClient::new("https://example.com/jokeapi").unwrap();
    let url = client.categories_url().unwrap();
    assert_eq!(url.path(), "/jokeapi/categories");
  }

  #[test]
  fn test_invalid_base_url_is_rejected() {
    assert!(JokeApiClient::new("not a url").is_err());
  }
}
