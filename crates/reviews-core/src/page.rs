//! Keyset pagination over current reviews.

use serde::{Deserialize, Serialize};

use crate::review::ReviewHistory;

/// Rows per page of the category listing.
pub const PAGE_SIZE: usize = 15;

/// Number of categories returned by the trend ranking.
pub const TREND_LIMIT: usize = 5;

/// Parameters for [`crate::store::ReviewStore::reviews_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  pub category_id: i64,
  /// The `id` of the last row of the previous page.
  pub cursor:      Option<i64>,
  pub page_size:   usize,
}

impl PageRequest {
  pub fn new(category_id: i64, cursor: Option<i64>) -> Self {
    Self { category_id, cursor, page_size: PAGE_SIZE }
  }
}

/// One page of current reviews, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPage {
  pub reviews:     Vec<ReviewHistory>,
  /// `id` of the last row when another page follows.
  pub next_cursor: Option<i64>,
  pub has_more:    bool,
}

impl ReviewPage {
  /// Build a page from up to `page_size + 1` fetched rows. The extra row only
  /// signals that another page exists and is dropped.
  pub fn from_overfetch(mut rows: Vec<ReviewHistory>, page_size: usize) -> Self {
    let has_more = rows.len() > page_size;
    rows.truncate(page_size);
    let next_cursor = if has_more { rows.last().map(|r| r.id) } else { None };
    Self { reviews: rows, next_cursor, has_more }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn rows(ids: &[i64]) -> Vec<ReviewHistory> {
    ids
      .iter()
      .map(|&id| ReviewHistory {
        id,
        review_id: format!("r{id}"),
        text: None,
        stars: 5,
        category_id: 1,
        tone: None,
        sentiment: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
      })
      .collect()
  }

  #[test]
  fn overfetch_sets_cursor_to_last_kept_row() {
    let page = ReviewPage::from_overfetch(rows(&[9, 8, 7, 6]), 3);
    assert!(page.has_more);
    assert_eq!(page.reviews.len(), 3);
    assert_eq!(page.next_cursor, Some(7));
  }

  #[test]
  fn exact_fit_is_final_page() {
    let page = ReviewPage::from_overfetch(rows(&[3, 2, 1]), 3);
    assert!(!page.has_more);
    assert_eq!(page.reviews.len(), 3);
    assert_eq!(page.next_cursor, None);
  }

  #[test]
  fn empty_page() {
    let page = ReviewPage::from_overfetch(Vec::new(), PAGE_SIZE);
    assert!(!page.has_more);
    assert!(page.reviews.is_empty());
    assert_eq!(page.next_cursor, None);
  }
}
