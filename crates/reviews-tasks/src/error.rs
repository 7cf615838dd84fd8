//! Error type for `reviews-tasks`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The analysis API answered with a non-success status.
  #[error("analysis API error: {0}")]
  Api(String),

  #[error("analysis API returned no text")]
  EmptyResponse,

  #[error("analyzer error: {0}")]
  Analyzer(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
