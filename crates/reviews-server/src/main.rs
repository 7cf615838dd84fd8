//! reviews-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store and then either serves the HTTP API with its background
//! worker, seeds sample data, or prints an inspection report.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand_core::OsRng;
use reviews_api::AppState;
use reviews_server::{ServerConfig, inspect, seed};
use reviews_store_sqlite::SqliteStore;
use reviews_tasks::{AnthropicAnalyzer, JobQueue, Worker};
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Review analytics server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API and run the job worker (default).
  Serve,
  /// Insert sample categories and reviews.
  Seed,
  /// Print a summary of the store contents.
  Inspect,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(cfg, store).await,
    Command::Seed => {
      let report = seed::seed(&store, &mut OsRng, Utc::now()).await?;
      info!(
        categories = report.categories_created,
        versions = report.versions_created,
        unlabelled = report.unlabelled_created,
        "seeding complete"
      );
      Ok(())
    }
    Command::Inspect => {
      print!("{}", inspect::render_report(&store).await?);
      Ok(())
    }
  }
}

async fn serve(cfg: ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  if cfg.anthropic_api_key.is_empty() {
    warn!("anthropic_api_key is not set; enrichment jobs will fail");
  }
  let analyzer = AnthropicAnalyzer::new(cfg.anthropic_api_key.clone(), cfg.anthropic_model.clone())
    .context("failed to build analyzer client")?;
  info!(model = analyzer.model(), "analyzer configured");

  let store = Arc::new(store);
  let (jobs, rx) = JobQueue::channel();
  let worker = tokio::spawn(
    Worker::new(
      Arc::clone(&store),
      Arc::new(analyzer),
      cfg.retry_policy(),
      cfg.worker_concurrency,
    )
    .run(rx),
  );

  let app = reviews_api::router(AppState { store, jobs });
  let address = cfg.address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  // The router held the last queue handle; the worker now drains and exits.
  info!("waiting for queued jobs");
  worker.await.context("worker task failed")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
}
