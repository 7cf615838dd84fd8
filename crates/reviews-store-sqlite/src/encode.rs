//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision and a `Z` suffix. Every encoded timestamp has the same width, so
//! SQL `MAX()` and `ORDER BY` on the text column are chronological.

use chrono::{DateTime, SecondsFormat, Utc};
use reviews_core::{
  category::Category,
  review::{AccessLog, ReviewHistory},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `review_history` row with its timestamps still encoded.
pub struct RawReview {
  pub id:          i64,
  pub review_id:   String,
  pub text:        Option<String>,
  pub stars:       i64,
  pub category_id: i64,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

/// Read a row selected with [`crate::schema::REVIEW_COLUMNS`].
pub fn raw_review(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReview> {
  Ok(RawReview {
    id:          row.get(0)?,
    review_id:   row.get(1)?,
    text:        row.get(2)?,
    stars:       row.get(3)?,
    category_id: row.get(4)?,
    tone:        row.get(5)?,
    sentiment:   row.get(6)?,
    created_at:  row.get(7)?,
    updated_at:  row.get(8)?,
  })
}

impl RawReview {
  pub fn into_review(self) -> Result<ReviewHistory> {
    Ok(ReviewHistory {
      id:          self.id,
      review_id:   self.review_id,
      text:        self.text,
      stars:       self.stars,
      category_id: self.category_id,
      tone:        self.tone,
      sentiment:   self.sentiment,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// An `access_logs` row with its timestamp still encoded.
pub struct RawAccessLog {
  pub id:         i64,
  pub text:       String,
  pub created_at: String,
}

impl RawAccessLog {
  pub fn into_access_log(self) -> Result<AccessLog> {
    Ok(AccessLog {
      id:         self.id,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
  Ok(Category {
    id:          row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
  })
}
