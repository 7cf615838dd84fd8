//! SQL schema for the reviews SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT
);

-- One row per version of a logical review. Edits insert new rows; only
-- tone, sentiment and updated_at are ever updated in place.
CREATE TABLE IF NOT EXISTS review_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    text        TEXT,
    stars       INTEGER NOT NULL,
    review_id   TEXT NOT NULL,
    tone        TEXT,
    sentiment   TEXT,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    created_at  TEXT NOT NULL,   -- fixed-width RFC 3339 UTC; sorts lexically
    updated_at  TEXT NOT NULL,
    CONSTRAINT check_stars_range CHECK (stars >= 1 AND stars <= 10)
);

CREATE TABLE IF NOT EXISTS access_logs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS review_history_review_idx   ON review_history(review_id, created_at);
CREATE INDEX IF NOT EXISTS review_history_category_idx ON review_history(category_id);
CREATE INDEX IF NOT EXISTS access_logs_created_idx     ON access_logs(created_at);

PRAGMA user_version = 1;
";

/// Columns selected for every [`reviews_core::review::ReviewHistory`] read, in
/// the order expected by [`crate::encode::raw_review`].
pub const REVIEW_COLUMNS: &str =
  "id, review_id, text, stars, category_id, tone, sentiment, created_at, updated_at";

/// Latest-version resolution as common table expressions.
///
/// `?1` is an optional category filter (NULL for all categories). Defines
/// `current_reviews` with one row per `review_id`: first the per-review
/// maximum `created_at`, then the full rows joined back on
/// `(review_id, created_at)`, then the highest `id` among rows tied on the
/// timestamp.
pub const CURRENT_REVIEWS_CTE: &str = "
WITH latest_created AS (
    SELECT review_id, MAX(created_at) AS max_created_at
    FROM review_history
    WHERE ?1 IS NULL OR category_id = ?1
    GROUP BY review_id
),
current_ids AS (
    SELECT MAX(r.id) AS id
    FROM review_history r
    JOIN latest_created l
      ON r.review_id = l.review_id
     AND r.created_at = l.max_created_at
    WHERE ?1 IS NULL OR r.category_id = ?1
    GROUP BY r.review_id
),
current_reviews AS (
    SELECT r.id, r.review_id, r.text, r.stars, r.category_id,
           r.tone, r.sentiment, r.created_at, r.updated_at
    FROM review_history r
    JOIN current_ids c ON r.id = c.id
)
";
