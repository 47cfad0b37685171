//! Serde-deserializable types matching JokeAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

// ============================================================================
// Categories endpoint
// ============================================================================

/// One alias entry: `alias` is the legacy key, `resolved` the canonical name.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategoryAlias {
  pub alias: String,
  pub resolved: String,
}

/// Response of `GET /categories?format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategoriesResponse {
  #[serde(default)]
  pub error: bool,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(rename = "categoryAliases", default)]
  pub category_aliases: Vec<ApiCategoryAlias>,
}

// ============================================================================
// Joke endpoint
// ============================================================================

/// Content flags carried by every joke. Not persisted, but modeled so real
/// responses deserialize without surprises.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiJokeFlags {
  #[serde(default)]
  pub nsfw: bool,
  #[serde(default)]
  pub religious: bool,
  #[serde(default)]
  pub political: bool,
  #[serde(default)]
  pub racist: bool,
  #[serde(default)]
  pub sexist: bool,
  #[serde(default)]
  pub explicit: bool,
}

/// A single joke as delivered by the joke endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiJoke {
  pub id: i64,
  pub category: String,
  #[serde(rename = "type", default)]
  pub joke_type: String,
  pub joke: String,
  #[serde(default)]
  pub flags: ApiJokeFlags,
  #[serde(default)]
  pub safe: bool,
  #[serde(default)]
  pub lang: String,
}

/// Response of `GET /joke/{category}?type=single&amount={n}`.
///
/// With `amount` >= 2 the service wraps results in a `jokes` array; the
/// single-joke flat shape never occurs with the amounts this crate requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiJokesResponse {
  #[serde(default)]
  pub error: bool,
  #[serde(default)]
  pub amount: u32,
  #[serde(default)]
  pub jokes: Vec<ApiJoke>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_categories_response() {
    let body = r#"{
      "error": false,
      "categories": ["Any", "Misc", "Programming", "Dark"],
      "categoryAliases": [
        {"alias": "Miscellaneous", "resolved": "Misc"},
        {"alias": "Coding", "resolved": "Programming"}
      ],
      "timestamp": 1712345678901
    }"#;

    let parsed: ApiCategoriesResponse = serde_json::from_str(body).unwrap();
    assert!(!parsed.error);
    assert_eq!(parsed.categories.len(), 4);
    assert_eq!(parsed.category_aliases[1].alias, "Coding");
    assert_eq!(parsed.category_aliases[1].resolved, "Programming");
  }

  #[test]
  fn test_parse_jokes_response() {
    let body = r#"{
      "error": false,
      "amount": 2,
      "jokes": [
        {
          "category": "Programming",
          "type": "single",
          "joke": "There are only 10 kinds of people in this world.",
          "flags": {
            "nsfw": false,
            "religious": false,
            "political": false,
            "racist": false,
            "sexist": false,
            "explicit": false
          },
          "id": 1,
          "safe": true,
          "lang": "en"
        },
        {
          "category": "Programming",
          "type": "single",
          "joke": "A SQL query walks into a bar and asks two tables: may I join you?",
          "flags": {},
          "id": 2,
          "safe": true,
          "lang": "en"
        }
      ]
    }"#;

    let parsed: ApiJokesResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.amount, 2);
    assert_eq!(parsed.jokes.len(), 2);
    assert_eq!(parsed.jokes[0].id, 1);
    assert_eq!(parsed.jokes[1].joke_type, "single");
    assert!(!parsed.jokes[1].flags.nsfw);
  }

  #[test]
  fn test_missing_jokes_array_defaults_to_empty() {
    let parsed: ApiJokesResponse = serde_json::from_str(r#"{"error": true}"#).unwrap();
    assert!(parsed.error);
    assert!(parsed.jokes.is_empty());
  }
}
