//! The worker runtime that drains a [`JobReceiver`].
//!
//! Each job runs on its own tokio task, so a slow analyser call never holds up
//! access logging. At most `concurrency` jobs run at once; further jobs wait
//! in the queue. Failed attempts are retried according to a [`RetryPolicy`];
//! the job bodies in [`crate::handlers`] never retry themselves.

use std::{sync::Arc, time::Duration};

use reviews_core::store::ReviewStore;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, error, info, warn};

use crate::{analyzer::Analyzer, handlers, job::Job, queue::JobReceiver, Result};

/// How often, and how patiently, a failed job is re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts including the first. Zero is treated as one.
  pub max_attempts: u32,
  /// Pause between attempts.
  pub backoff:      Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, backoff: Duration::from_secs(2) }
  }
}

/// Jobs run at once when no limit is configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Executes queued jobs against a store and an analyser.
pub struct Worker<S, A> {
  store:    Arc<S>,
  analyzer: Arc<A>,
  policy:   RetryPolicy,
  permits:  Arc<Semaphore>,
}

impl<S, A> Clone for Worker<S, A> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      analyzer: Arc::clone(&self.analyzer),
      policy:   self.policy,
      permits:  Arc::clone(&self.permits),
    }
  }
}

impl<S, A> Worker<S, A>
where
  S: ReviewStore + 'static,
  A: Analyzer + 'static,
{
  /// A worker running at most `concurrency` jobs at once. Zero is treated as
  /// one.
  pub fn new(
    store: Arc<S>,
    analyzer: Arc<A>,
    policy: RetryPolicy,
    concurrency: usize,
  ) -> Self {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    Self { store, analyzer, policy, permits }
  }

  /// Run until every [`crate::JobQueue`] is dropped, then wait for in-flight
  /// jobs to finish.
  pub async fn run(self, mut jobs: JobReceiver) {
    info!(
      max_attempts = self.policy.max_attempts,
      concurrency = self.permits.available_permits(),
      "worker started"
    );
    let mut in_flight = JoinSet::new();

    loop {
      tokio::select! {
        job = jobs.recv() => match job {
          Some(job) => {
            // Wait for a free slot; finished tasks release theirs on drop.
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
              break;
            };
            let worker = self.clone();
            in_flight.spawn(async move {
              worker.execute(job).await;
              drop(permit);
            });
          }
          None => break,
        },
        Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
          if let Err(e) = joined {
            error!(error = %e, "job task panicked");
          }
        }
      }
    }

    while let Some(joined) = in_flight.join_next().await {
      if let Err(e) = joined {
        error!(error = %e, "job task panicked");
      }
    }
    info!("worker stopped");
  }

  /// Run `job` until it succeeds or the retry budget is spent.
  async fn execute(&self, job: Job) {
    let name = job.name();
    let max_attempts = self.policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
      match self.handle(&job).await {
        Ok(()) => {
          debug!(job = name, attempt, "job completed");
          return;
        }
        Err(e) if attempt < max_attempts => {
          warn!(job = name, attempt, error = %e, "job failed, retrying");
          tokio::time::sleep(self.policy.backoff).await;
        }
        Err(e) => {
          error!(job = name, attempts = attempt, error = %e, "job failed");
        }
      }
    }
  }

  async fn handle(&self, job: &Job) -> Result<()> {
    match job {
      Job::LogAccess { text } => handlers::log_access(self.store.as_ref(), text).await,
      Job::AnalyzeSentimentAndTone { review_history_id, text, stars } => {
        handlers::analyze_sentiment_and_tone(
          self.store.as_ref(),
          self.analyzer.as_ref(),
          *review_history_id,
          text,
          *stars,
        )
        .await
      }
    }
  }
}
