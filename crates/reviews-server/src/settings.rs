//! Runtime configuration.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use reviews_tasks::{DEFAULT_CONCURRENCY, RetryPolicy};
use serde::Deserialize;

/// Runtime server configuration, read from an optional TOML file and
/// `REVIEWS_*` environment variables. Built once at start-up and passed to
/// whatever needs it.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                    String,
  #[serde(default = "default_port")]
  pub port:                    u16,
  #[serde(default = "default_store_path")]
  pub store_path:              PathBuf,
  /// Required for enrichment; with an empty key every enrichment job fails.
  #[serde(default)]
  pub anthropic_api_key:       String,
  #[serde(default = "default_model")]
  pub anthropic_model:         String,
  #[serde(default = "default_max_attempts")]
  pub worker_max_attempts:     u32,
  #[serde(default = "default_backoff_ms")]
  pub worker_retry_backoff_ms: u64,
  /// Jobs the worker runs at once.
  #[serde(default = "default_concurrency")]
  pub worker_concurrency:      usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("reviews.db") }

fn default_model() -> String { "claude-3-5-sonnet-20241022".to_string() }

fn default_max_attempts() -> u32 { 3 }

fn default_backoff_ms() -> u64 { 2000 }

fn default_concurrency() -> usize { DEFAULT_CONCURRENCY }

impl ServerConfig {
  /// Read `path` if it exists, then overlay the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      config::Config::builder().add_source(File::from(path.to_path_buf()).required(false)),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
    builder
      .add_source(Environment::with_prefix("REVIEWS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_attempts: self.worker_max_attempts,
      backoff:      Duration::from_millis(self.worker_retry_backoff_ms),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    ServerConfig::from_builder(
      config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
    .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "127.0.0.1:8000");
    assert_eq!(cfg.store_path, PathBuf::from("reviews.db"));
    assert_eq!(cfg.anthropic_model, "claude-3-5-sonnet-20241022");
    assert_eq!(cfg.retry_policy(), RetryPolicy {
      max_attempts: 3,
      backoff:      Duration::from_secs(2),
    });
    assert_eq!(cfg.worker_concurrency, DEFAULT_CONCURRENCY);
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      r#"
        host = "0.0.0.0"
        port = 9000
        store_path = "/var/lib/reviews/reviews.db"
        anthropic_api_key = "sk-test"
        worker_max_attempts = 5
        worker_retry_backoff_ms = 10
        worker_concurrency = 8
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.anthropic_api_key, "sk-test");
    assert_eq!(cfg.resolved_store_path(), PathBuf::from("/var/lib/reviews/reviews.db"));
    assert_eq!(cfg.retry_policy().max_attempts, 5);
    assert_eq!(cfg.retry_policy().backoff, Duration::from_millis(10));
    assert_eq!(cfg.worker_concurrency, 8);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/reviews.db")),
      PathBuf::from(home).join("reviews.db")
    );
    assert_eq!(expand_tilde(Path::new("reviews.db")), PathBuf::from("reviews.db"));
  }
}
