/// Schema for catalog tables. `IF NOT EXISTS` keeps reopening idempotent.
pub const SCHEMA: &str = r#"
-- Jokes, keyed by the remote-assigned id
CREATE TABLE IF NOT EXISTS jokes (
    id INTEGER PRIMARY KEY,
    category TEXT NOT NULL,
    joke_text TEXT NOT NULL,
    is_custom INTEGER NOT NULL DEFAULT 0,
    inserted_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jokes_category
    ON jokes(category, inserted_at);

-- Categories, keyed by name; alias is the remote-facing key when present
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    alias TEXT
);
"#;
