//! In-process job queue.
//!
//! Enqueueing is synchronous and infallible from the caller's point of view:
//! the channel is unbounded, and a queue whose worker has gone away only logs
//! and drops the job.

use reviews_core::review::ReviewHistory;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::job::Job;

/// Sending half of the queue. Cheap to clone; hand one to every request
/// handler.
#[derive(Debug, Clone)]
pub struct JobQueue {
  tx: mpsc::UnboundedSender<Job>,
}

/// Receiving half of the queue, owned by a [`crate::Worker`].
#[derive(Debug)]
pub struct JobReceiver {
  rx: mpsc::UnboundedReceiver<Job>,
}

impl JobQueue {
  pub fn channel() -> (JobQueue, JobReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (JobQueue { tx }, JobReceiver { rx })
  }

  /// Submit `job` without waiting for it to run.
  pub fn enqueue(&self, job: Job) {
    let name = job.name();
    match self.tx.send(job) {
      Ok(()) => debug!(job = name, "job enqueued"),
      Err(_) => warn!(job = name, "job queue is closed, dropping job"),
    }
  }

  pub fn log_access(&self, text: impl Into<String>) {
    self.enqueue(Job::LogAccess { text: text.into() });
  }

  /// Request enrichment of `review`. Rows without text are skipped.
  pub fn analyze_sentiment_and_tone(&self, review: &ReviewHistory) {
    let Some(text) = review.text.as_deref().filter(|t| !t.is_empty()) else {
      return;
    };
    self.enqueue(Job::AnalyzeSentimentAndTone {
      review_history_id: review.id,
      text:              text.to_owned(),
      stars:             review.stars,
    });
  }
}

impl JobReceiver {
  /// Wait for the next job; `None` once every [`JobQueue`] has been dropped
  /// and the backlog is empty.
  pub async fn recv(&mut self) -> Option<Job> { self.rx.recv().await }

  /// Take the next job if one is already waiting.
  pub fn try_recv(&mut self) -> Option<Job> { self.rx.try_recv().ok() }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn review(text: Option<&str>) -> ReviewHistory {
    ReviewHistory {
      id:          7,
      review_id:   "r7".into(),
      text:        text.map(str::to_owned),
      stars:       4,
      category_id: 1,
      tone:        None,
      sentiment:   None,
      created_at:  Utc::now(),
      updated_at:  Utc::now(),
    }
  }

  #[test]
  fn jobs_arrive_in_order() {
    let (queue, mut rx) = JobQueue::channel();
    queue.log_access("GET /reviews/trends");
    queue.analyze_sentiment_and_tone(&review(Some("Broke after a week.")));

    assert_eq!(
      rx.try_recv(),
      Some(Job::LogAccess { text: "GET /reviews/trends".into() })
    );
    assert_eq!(
      rx.try_recv(),
      Some(Job::AnalyzeSentimentAndTone {
        review_history_id: 7,
        text:              "Broke after a week.".into(),
        stars:             4,
      })
    );
    assert_eq!(rx.try_recv(), None);
  }

  #[test]
  fn reviews_without_text_are_not_enqueued() {
    let (queue, mut rx) = JobQueue::channel();
    queue.analyze_sentiment_and_tone(&review(None));
    queue.analyze_sentiment_and_tone(&review(Some("")));
    assert_eq!(rx.try_recv(), None);
  }

  #[test]
  fn enqueue_after_receiver_dropped_does_not_panic() {
    let (queue, rx) = JobQueue::channel();
    drop(rx);
    queue.log_access("GET /health");
  }
}
