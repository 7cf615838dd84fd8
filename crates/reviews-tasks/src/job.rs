//! The jobs a request can hand off.

/// A unit of background work. Every job is fire-and-forget: the enqueuer never
/// observes its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
  /// Append one access-log row.
  LogAccess { text: String },
  /// Label one review version with tone and sentiment.
  AnalyzeSentimentAndTone {
    review_history_id: i64,
    text:              String,
    stars:             i64,
  },
}

impl Job {
  /// Stable job name, used in logs.
  pub fn name(&self) -> &'static str {
    match self {
      Self::LogAccess { .. } => "log_access",
      Self::AnalyzeSentimentAndTone { .. } => "analyze_sentiment_and_tone",
    }
  }
}
