//! Error types for `reviews-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("stars must be between 1 and 10, got {0}")]
  StarsOutOfRange(i64),

  #[error("review_id must not be empty")]
  EmptyReviewId,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
