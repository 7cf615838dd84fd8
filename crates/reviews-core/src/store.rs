//! The `ReviewStore` trait.
//!
//! Implemented by storage backends (e.g. `reviews-store-sqlite`). The API and
//! the background jobs depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  category::{Category, CategoryTrend, NewCategory},
  page::{PageRequest, ReviewPage},
  review::{AccessLog, NewReview, ReviewHistory, ReviewLabels},
  stats::{CategoryStats, StoreSummary},
};

/// Abstraction over a review store backend.
///
/// Review versions are append-only; the only in-place update is
/// [`ReviewStore::apply_labels`]. All methods return `Send` futures so the
/// trait can be used from axum handlers and spawned worker tasks.
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Categories ────────────────────────────────────────────────────────

  fn add_category(
    &self,
    input: NewCategory,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  fn get_category(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  /// All categories ordered by id.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  // ── Reviews — append-only writes ──────────────────────────────────────

  /// Append one version of a review. The database rejects stars outside
  /// 1..=10 and unknown categories.
  fn record_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<ReviewHistory, Self::Error>> + Send + '_;

  /// Overwrite tone and sentiment on one row inside a single transaction.
  ///
  /// Returns `false` without writing anything if the row does not exist.
  fn apply_labels<'a>(
    &'a self,
    id: i64,
    labels: &'a ReviewLabels,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Reviews — reads ───────────────────────────────────────────────────

  fn get_review(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ReviewHistory>, Self::Error>> + Send + '_;

  /// The current version of every logical review, optionally restricted to
  /// one category. Exactly one row per `review_id`: the one with the latest
  /// `created_at`, the highest `id` among ties.
  fn current_reviews(
    &self,
    category_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<ReviewHistory>, Self::Error>> + Send + '_;

  /// Up to `limit` categories ranked by mean stars over current reviews,
  /// highest first. Categories without reviews are omitted.
  fn category_trends(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<CategoryTrend>, Self::Error>> + Send + '_;

  /// One page of a category's current reviews, newest first.
  fn reviews_page<'a>(
    &'a self,
    request: &'a PageRequest,
  ) -> impl Future<Output = Result<ReviewPage, Self::Error>> + Send + 'a;

  /// The most recently created versions across all categories.
  fn recent_reviews(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ReviewHistory>, Self::Error>> + Send + '_;

  // ── Access log ────────────────────────────────────────────────────────

  fn record_access(
    &self,
    text: String,
  ) -> impl Future<Output = Result<AccessLog, Self::Error>> + Send + '_;

  /// Newest first.
  fn recent_access_logs(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<AccessLog>, Self::Error>> + Send + '_;

  // ── Inspection ────────────────────────────────────────────────────────

  fn category_stats(
    &self,
  ) -> impl Future<Output = Result<Vec<CategoryStats>, Self::Error>> + Send + '_;

  fn summary(
    &self,
  ) -> impl Future<Output = Result<StoreSummary, Self::Error>> + Send + '_;
}
