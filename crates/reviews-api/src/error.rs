//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

/// An error returned by an API handler.
///
/// The cause is logged; the client only sees the status code.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(error = %self, "request failed");
    status.into_response()
  }
}
