//! Background jobs for the reviews service.
//!
//! Request handlers hand work to a [`JobQueue`] and return immediately. A
//! [`Worker`] drains the queue on its own tasks, running each [`Job`] against
//! the store and, for enrichment, an [`Analyzer`].

pub mod analyzer;
pub mod error;
pub mod handlers;
pub mod job;
pub mod labels;
pub mod queue;
pub mod worker;

pub use analyzer::{Analyzer, AnthropicAnalyzer};
pub use error::{Error, Result};
pub use job::Job;
pub use queue::{JobQueue, JobReceiver};
pub use worker::{DEFAULT_CONCURRENCY, RetryPolicy, Worker};
