//! Handlers for `/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reviews/trends` | Top categories by mean stars of current reviews |
//! | `GET`  | `/reviews/` | `?category_id` required; optional `cursor` |
//!
//! Both endpoints enqueue an access-log job. The listing also enqueues an
//! enrichment job for every returned review still missing a label. Neither
//! waits for its jobs.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use reviews_core::{
  category::CategoryTrend,
  page::{PageRequest, ReviewPage, TREND_LIMIT},
  review::ReviewHistory,
  store::ReviewStore,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppState, error::ApiError};

// ─── Trends ───────────────────────────────────────────────────────────────────

/// `GET /reviews/trends`
pub async fn trends<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<CategoryTrend>>, ApiError>
where
  S: ReviewStore + Clone + 'static,
{
  state.jobs.log_access("GET /reviews/trends");

  let trends = state
    .store
    .category_trends(TREND_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(trends))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the category whose reviews to return.
  pub category_id: i64,
  /// `next_cursor` from the previous page.
  pub cursor:      Option<i64>,
}

/// One review version as returned by the listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
  pub id:          i64,
  pub text:        Option<String>,
  pub stars:       i64,
  pub review_id:   String,
  pub created_at:  DateTime<Utc>,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub category_id: i64,
}

impl From<ReviewHistory> for ReviewResponse {
  fn from(r: ReviewHistory) -> Self {
    ReviewResponse {
      id:          r.id,
      text:        r.text,
      stars:       r.stars,
      review_id:   r.review_id,
      created_at:  r.created_at,
      tone:        r.tone,
      sentiment:   r.sentiment,
      category_id: r.category_id,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
  pub reviews:     Vec<ReviewResponse>,
  pub next_cursor: Option<i64>,
  pub has_more:    bool,
}

impl From<ReviewPage> for ReviewListResponse {
  fn from(page: ReviewPage) -> Self {
    ReviewListResponse {
      reviews:     page.reviews.into_iter().map(ReviewResponse::from).collect(),
      next_cursor: page.next_cursor,
      has_more:    page.has_more,
    }
  }
}

/// `GET /reviews/?category_id=<id>[&cursor=<id>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ReviewListResponse>, ApiError>
where
  S: ReviewStore + Clone + 'static,
{
  state
    .jobs
    .log_access(format!("GET /reviews/?category_id={}", params.category_id));

  let request = PageRequest::new(params.category_id, params.cursor);
  let page = state
    .store
    .reviews_page(&request)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut dispatched = 0;
  for review in page.reviews.iter().filter(|r| r.needs_labels()) {
    state.jobs.analyze_sentiment_and_tone(review);
    dispatched += 1;
  }
  debug!(
    category_id = params.category_id,
    returned = page.reviews.len(),
    dispatched,
    has_more = page.has_more,
    "listed reviews"
  );

  Ok(Json(ReviewListResponse::from(page)))
}
