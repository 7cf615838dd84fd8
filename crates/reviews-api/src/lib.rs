//! JSON HTTP API for the reviews service.
//!
//! Exposes an axum [`Router`] backed by any [`ReviewStore`] and a
//! [`JobQueue`] for the fire-and-forget side effects of each request.
//! TLS and process lifecycle are the caller's responsibility.

pub mod error;
pub mod reviews;
pub mod service;

use std::sync::Arc;

use axum::{Router, routing::get};
use reviews_core::store::ReviewStore;
use reviews_tasks::JobQueue;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ReviewStore> {
  pub store: Arc<S>,
  pub jobs:  JobQueue,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ReviewStore + Clone + 'static,
{
  Router::new()
    .route("/",               get(service::root))
    .route("/health",         get(service::health))
    .route("/reviews/trends", get(reviews::trends::<S>))
    .route("/reviews/",       get(reviews::list::<S>))
    .route("/reviews",        get(reviews::list::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
  };
  use reviews_core::{
    category::NewCategory,
    page::PAGE_SIZE,
    review::NewReview,
  };
  use reviews_store_sqlite::SqliteStore;
  use reviews_tasks::{Job, JobReceiver};
  use serde_json::Value;
  use tower::ServiceExt as _;

  use crate::reviews::ReviewListResponse;

  async fn make_state() -> (AppState<SqliteStore>, JobReceiver) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let (jobs, rx) = JobQueue::channel();
    (AppState { store: Arc::new(store), jobs }, rx)
  }

  async fn get_uri(state: AppState<SqliteStore>, uri: &str) -> Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn drain(rx: &mut JobReceiver) -> Vec<Job> {
    std::iter::from_fn(|| rx.try_recv()).collect()
  }

  // ── Service endpoints ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_describes_endpoints() {
    let (state, _rx) = make_state().await;
    let resp = get_uri(state, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Reviews API");
    assert_eq!(json["endpoints"]["trends"], "/reviews/trends");
  }

  #[tokio::test]
  async fn health_is_healthy() {
    let (state, mut rx) = make_state().await;
    let resp = get_uri(state, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "healthy");
    assert!(drain(&mut rx).is_empty());
  }

  // ── Trends ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn trends_average_current_reviews() {
    let (state, mut rx) = make_state().await;
    let books = state
      .store
      .add_category(NewCategory::new("Books", Some("Books and literature")))
      .await
      .unwrap();
    for (rid, stars) in [("a", 9), ("b", 9), ("c", 3)] {
      state
        .store
        .record_review(NewReview::new(rid, books.id, stars, Some("text")))
        .await
        .unwrap();
    }

    let resp = get_uri(state, "/reviews/trends").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let trends = json.as_array().unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0]["name"], "Books");
    assert_eq!(trends[0]["description"], "Books and literature");
    assert_eq!(trends[0]["average_stars"], 7.0);
    assert_eq!(trends[0]["total_reviews"], 3);

    assert_eq!(drain(&mut rx), vec![Job::LogAccess {
      text: "GET /reviews/trends".into(),
    }]);
  }

  #[tokio::test]
  async fn trends_empty_store_returns_empty_list() {
    let (state, _rx) = make_state().await;
    let resp = get_uri(state, "/reviews/trends").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, Value::Array(vec![]));
  }

  // ── Listing ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_requires_category_id() {
    let (state, mut rx) = make_state().await;
    let resp = get_uri(state, "/reviews/").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(drain(&mut rx).is_empty());
  }

  #[tokio::test]
  async fn list_pages_through_category() {
    let (state, _rx) = make_state().await;
    let c = state
      .store
      .add_category(NewCategory::new("Toys", None))
      .await
      .unwrap();
    for i in 0..20 {
      state
        .store
        .record_review(
          NewReview::new(format!("r{i}"), c.id, 5, Some("fine"))
            .labelled("Neutral", "Neutral"),
        )
        .await
        .unwrap();
    }

    let resp = get_uri(state.clone(), &format!("/reviews/?category_id={}", c.id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: ReviewListResponse = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(first.reviews.len(), PAGE_SIZE);
    assert!(first.has_more);
    let cursor = first.next_cursor.unwrap();
    assert_eq!(cursor, first.reviews.last().unwrap().id);

    let resp = get_uri(
      state,
      &format!("/reviews?category_id={}&cursor={cursor}", c.id),
    )
    .await;
    let second: ReviewListResponse = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(second.reviews.len(), 5);
    assert!(!second.has_more);
    assert!(second.next_cursor.is_none());

    let mut ids: Vec<i64> = first
      .reviews
      .iter()
      .chain(second.reviews.iter())
      .map(|r| r.id)
      .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
  }

  #[tokio::test]
  async fn list_dispatches_enrichment_for_unlabelled_rows_only() {
    let (state, mut rx) = make_state().await;
    let c = state
      .store
      .add_category(NewCategory::new("Books", None))
      .await
      .unwrap();
    let unlabelled = state
      .store
      .record_review(NewReview::new("u", c.id, 4, Some("Not what I expected.")))
      .await
      .unwrap();
    state
      .store
      .record_review(
        NewReview::new("l", c.id, 9, Some("Great!")).labelled("Happy", "Positive"),
      )
      .await
      .unwrap();
    state
      .store
      .record_review(NewReview::new("e", c.id, 6, None))
      .await
      .unwrap();

    let uri = format!("/reviews/?category_id={}", c.id);
    let resp = get_uri(state.clone(), &uri).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(drain(&mut rx), vec![
      Job::LogAccess { text: format!("GET /reviews/?category_id={}", c.id) },
      Job::AnalyzeSentimentAndTone {
        review_history_id: unlabelled.id,
        text:              "Not what I expected.".into(),
        stars:             4,
      },
    ]);

    // No deduplication: viewing again dispatches again.
    get_uri(state, &uri).await;
    let again = drain(&mut rx);
    assert_eq!(again.len(), 2);
    assert_eq!(again[1].name(), "analyze_sentiment_and_tone");
  }

  #[tokio::test]
  async fn list_returns_only_current_versions() {
    let (state, _rx) = make_state().await;
    let c = state
      .store
      .add_category(NewCategory::new("Books", None))
      .await
      .unwrap();
    state
      .store
      .record_review(NewReview::new("a", c.id, 3, Some("meh")).labelled("Casual", "Neutral"))
      .await
      .unwrap();
    let edited = state
      .store
      .record_review(
        NewReview::new("a", c.id, 8, Some("meh (Edited)")).labelled("Happy", "Positive"),
      )
      .await
      .unwrap();

    let resp = get_uri(state, &format!("/reviews/?category_id={}", c.id)).await;
    let page: ReviewListResponse = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(page.reviews.len(), 1);
    assert_eq!(page.reviews[0].id, edited.id);
    assert_eq!(page.reviews[0].stars, 8);
  }

  // ── Store failures ──────────────────────────────────────────────────────────

  mod failing {
    use reviews_core::{
      category::{Category, CategoryTrend, NewCategory},
      page::{PageRequest, ReviewPage},
      review::{AccessLog, NewReview, ReviewHistory, ReviewLabels},
      stats::{CategoryStats, StoreSummary},
      store::ReviewStore,
    };

    pub const SECRET: &str = "no such table: review_history at /var/lib/reviews.db";

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    pub struct Broken(&'static str);

    /// A store whose every call fails with [`SECRET`].
    #[derive(Clone)]
    pub struct FailingStore;

    fn fail<T>() -> Result<T, Broken> { Err(Broken(SECRET)) }

    impl ReviewStore for FailingStore {
      type Error = Broken;

      async fn add_category(&self, _: NewCategory) -> Result<Category, Broken> { fail() }

      async fn get_category(&self, _: i64) -> Result<Option<Category>, Broken> { fail() }

      async fn list_categories(&self) -> Result<Vec<Category>, Broken> { fail() }

      async fn record_review(&self, _: NewReview) -> Result<ReviewHistory, Broken> { fail() }

      async fn apply_labels(&self, _: i64, _: &ReviewLabels) -> Result<bool, Broken> { fail() }

      async fn get_review(&self, _: i64) -> Result<Option<ReviewHistory>, Broken> { fail() }

      async fn current_reviews(&self, _: Option<i64>) -> Result<Vec<ReviewHistory>, Broken> {
        fail()
      }

      async fn category_trends(&self, _: usize) -> Result<Vec<CategoryTrend>, Broken> { fail() }

      async fn reviews_page(&self, _: &PageRequest) -> Result<ReviewPage, Broken> { fail() }

      async fn recent_reviews(&self, _: usize) -> Result<Vec<ReviewHistory>, Broken> { fail() }

      async fn record_access(&self, _: String) -> Result<AccessLog, Broken> { fail() }

      async fn recent_access_logs(&self, _: usize) -> Result<Vec<AccessLog>, Broken> { fail() }

      async fn category_stats(&self) -> Result<Vec<CategoryStats>, Broken> { fail() }

      async fn summary(&self) -> Result<StoreSummary, Broken> { fail() }
    }
  }

  async fn get_failing(uri: &str) -> (StatusCode, Vec<u8>) {
    let (jobs, _rx) = JobQueue::channel();
    let state = AppState { store: Arc::new(failing::FailingStore), jobs };
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
  }

  #[tokio::test]
  async fn store_failure_is_a_bare_500() {
    for uri in ["/reviews/trends", "/reviews/?category_id=1"] {
      let (status, body) = get_failing(uri).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
      let body = String::from_utf8(body).unwrap();
      assert!(!body.contains(failing::SECRET), "{uri} leaked {body:?}");
      assert!(!body.contains("error"), "{uri} returned {body:?}");
    }
  }
}
