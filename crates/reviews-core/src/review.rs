//! Review versions and access-log records.
//!
//! A logical review is the set of [`ReviewHistory`] rows sharing one
//! `review_id`. Edits append a new row rather than updating an existing one;
//! the row with the latest `created_at` is the current version. The only
//! in-place mutation is the one-time write of the tone/sentiment labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MIN_STARS: i64 = 1;
pub const MAX_STARS: i64 = 10;

// ─── ReviewHistory ───────────────────────────────────────────────────────────

/// One version of a logical review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewHistory {
  /// Monotonically assigned; doubles as the pagination cursor.
  pub id:          i64,
  /// Identifies the logical review. Shared by every version of it.
  pub review_id:   String,
  pub text:        Option<String>,
  pub stars:       i64,
  pub category_id: i64,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl ReviewHistory {
  /// Whether this row should be sent for enrichment: at least one label is
  /// missing and there is text to analyse.
  pub fn needs_labels(&self) -> bool {
    (self.tone.is_none() || self.sentiment.is_none())
      && self.text.as_deref().is_some_and(|t| !t.is_empty())
  }
}

// ─── NewReview ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::ReviewStore::record_review`].
#[derive(Debug, Clone)]
pub struct NewReview {
  pub review_id:   String,
  pub text:        Option<String>,
  pub stars:       i64,
  pub category_id: i64,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  /// Defaults to the time of insertion. Only seeding and tests backdate.
  pub created_at:  Option<DateTime<Utc>>,
}

impl NewReview {
  /// An unlabelled review stamped at insertion time.
  pub fn new(
    review_id: impl Into<String>,
    category_id: i64,
    stars: i64,
    text: Option<&str>,
  ) -> Self {
    Self {
      review_id: review_id.into(),
      text: text.map(str::to_owned),
      stars,
      category_id,
      tone: None,
      sentiment: None,
      created_at: None,
    }
  }

  pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
    self.created_at = Some(created_at);
    self
  }

  pub fn labelled(mut self, tone: &str, sentiment: &str) -> Self {
    self.tone = Some(tone.to_owned());
    self.sentiment = Some(sentiment.to_owned());
    self
  }

  /// Checks the invariants the database also enforces, so batch writers can
  /// fail before touching the store.
  pub fn validate(&self) -> Result<()> {
    if self.review_id.is_empty() {
      return Err(Error::EmptyReviewId);
    }
    if !(MIN_STARS..=MAX_STARS).contains(&self.stars) {
      return Err(Error::StarsOutOfRange(self.stars));
    }
    Ok(())
  }
}

// ─── Labels ──────────────────────────────────────────────────────────────────

/// Tone and sentiment produced by enrichment. Either may be absent when the
/// analyser's reply lacks the corresponding line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLabels {
  pub tone:      Option<String>,
  pub sentiment: Option<String>,
}

// ─── AccessLog ───────────────────────────────────────────────────────────────

/// Append-only audit record for one logged API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLog {
  pub id:         i64,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}
