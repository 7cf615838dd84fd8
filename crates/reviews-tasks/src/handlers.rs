//! The job bodies. Each runs once per attempt; retrying is the worker's
//! business.

use reviews_core::store::ReviewStore;
use tracing::debug;

use crate::{
  analyzer::Analyzer,
  labels::{analysis_prompt, parse_labels},
  Error, Result,
};

/// Append one access-log row.
pub async fn log_access<S>(store: &S, text: &str) -> Result<()>
where
  S: ReviewStore,
{
  store
    .record_access(text.to_owned())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(())
}

/// Ask `analyzer` for tone and sentiment of one review and store them on the
/// row `review_history_id`.
///
/// The row is loaded inside the store's write transaction; if it has been
/// deleted in the meantime nothing is written and the job still succeeds.
pub async fn analyze_sentiment_and_tone<S, A>(
  store: &S,
  analyzer: &A,
  review_history_id: i64,
  text: &str,
  stars: i64,
) -> Result<()>
where
  S: ReviewStore,
  A: Analyzer,
{
  let prompt = analysis_prompt(text, stars);
  let reply = analyzer
    .complete(&prompt)
    .await
    .map_err(|e| Error::Analyzer(Box::new(e)))?;

  let labels = parse_labels(&reply);
  let applied = store
    .apply_labels(review_history_id, &labels)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  if applied {
    debug!(
      review_history_id,
      tone = ?labels.tone,
      sentiment = ?labels.sentiment,
      "review labelled"
    );
  } else {
    debug!(review_history_id, "review no longer exists, nothing to label");
  }
  Ok(())
}
