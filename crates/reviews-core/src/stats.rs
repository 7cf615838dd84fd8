//! Read models for the store inspection report.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Per-category counts. Unlike [`crate::category::CategoryTrend`], these are
/// computed over every stored version, not only current ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
  pub category:                   Category,
  pub total_versions:             i64,
  pub logical_reviews:            i64,
  /// `None` when the category has no reviews at all.
  pub average_stars_all_versions: Option<f64>,
}

/// Store-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
  pub total_versions:         i64,
  pub logical_reviews:        i64,
  pub missing_tone:           i64,
  pub missing_sentiment:      i64,
  /// `(stars, count)` for every star value 1..=10, including zero counts.
  pub stars_distribution:     Vec<(i64, i64)>,
  /// `(sentiment, count)`; `None` groups unlabelled rows.
  pub sentiment_distribution: Vec<(Option<String>, i64)>,
}

impl StoreSummary {
  /// Versions beyond the first of each logical review.
  pub fn edits(&self) -> i64 { self.total_versions - self.logical_reviews }
}
