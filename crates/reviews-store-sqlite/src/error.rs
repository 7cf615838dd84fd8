//! Error type for `reviews-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A CHECK, FOREIGN KEY, UNIQUE or NOT NULL constraint rejected a write.
  #[error("constraint violation: {0}")]
  Constraint(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Classify a database error, pulling constraint violations out of the
  /// generic `Database` bucket.
  pub(crate) fn from_db(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, msg))
        if code.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Error::Constraint(msg.unwrap_or_else(|| code.to_string()))
      }
      other => Error::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
