//! Plain-text report of what is in the store.

use std::fmt::Write as _;

use reviews_core::store::ReviewStore;

const RULE_WIDTH: usize = 80;
const RECENT_REVIEWS: usize = 5;
const RECENT_ACCESS_LOGS: usize = 10;
const PREVIEW_CHARS: usize = 60;
const BAR_SCALE: i64 = 2;

/// Render the inspection report for `store`.
pub async fn render_report<S: ReviewStore>(store: &S) -> anyhow::Result<String> {
  let categories = store.category_stats().await?;
  let summary = store.summary().await?;
  let recent = store.recent_reviews(RECENT_REVIEWS).await?;
  let logs = store.recent_access_logs(RECENT_ACCESS_LOGS).await?;

  let mut out = String::new();

  heading(&mut out, "CATEGORIES")?;
  for stats in &categories {
    let avg = stats
      .average_stars_all_versions
      .map_or_else(|| "-".to_string(), |a| format!("{a:.2}"));
    writeln!(
      out,
      "  [{}] {:<16} versions: {:>4}  unique reviews: {:>4}  avg stars: {}",
      stats.category.id,
      stats.category.name,
      stats.total_versions,
      stats.logical_reviews,
      avg,
    )?;
  }

  heading(&mut out, "REVIEW STATISTICS")?;
  writeln!(out, "  Total review versions:  {}", summary.total_versions)?;
  writeln!(out, "  Unique reviews:         {}", summary.logical_reviews)?;
  writeln!(out, "  Edits:                  {}", summary.edits())?;
  writeln!(out, "  Missing tone:           {}", summary.missing_tone)?;
  writeln!(out, "  Missing sentiment:      {}", summary.missing_sentiment)?;

  heading(&mut out, "RECENT REVIEWS")?;
  for review in &recent {
    writeln!(
      out,
      "  #{} {} ({} stars, category {})",
      review.id, review.review_id, review.stars, review.category_id
    )?;
    writeln!(out, "     {}", preview(review.text.as_deref().unwrap_or("")))?;
    writeln!(
      out,
      "     tone: {}  sentiment: {}  at {}",
      review.tone.as_deref().unwrap_or("None"),
      review.sentiment.as_deref().unwrap_or("None"),
      review.created_at.format("%Y-%m-%d %H:%M:%S"),
    )?;
  }

  heading(&mut out, "ACCESS LOGS")?;
  if logs.is_empty() {
    writeln!(out, "  No access logs yet. Make some API requests!")?;
  }
  for log in &logs {
    writeln!(out, "  {}  {}", log.created_at.format("%Y-%m-%d %H:%M:%S"), log.text)?;
  }

  heading(&mut out, "STARS DISTRIBUTION")?;
  for (stars, count) in &summary.stars_distribution {
    writeln!(out, "  {stars:>2} stars: {} {count}", bar(*count))?;
  }

  heading(&mut out, "SENTIMENT DISTRIBUTION")?;
  for (sentiment, count) in &summary.sentiment_distribution {
    let label = sentiment.as_deref().unwrap_or("None (pending)");
    writeln!(out, "  {label:<16} {count}")?;
  }

  Ok(out)
}

fn heading(out: &mut String, title: &str) -> std::fmt::Result {
  let rule = "=".repeat(RULE_WIDTH);
  writeln!(out, "\n{rule}\n{title}\n{rule}")
}

fn preview(text: &str) -> String {
  if text.chars().count() > PREVIEW_CHARS {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
  } else {
    text.to_string()
  }
}

fn bar(count: i64) -> String {
  let len = if count > 0 { (count / BAR_SCALE).max(1) } else { 0 };
  "#".repeat(len as usize)
}

#[cfg(test)]
mod tests {
  use reviews_core::{category::NewCategory, review::NewReview};
  use reviews_store_sqlite::SqliteStore;

  use super::*;

  #[tokio::test]
  async fn empty_store_reports_no_access_logs() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = render_report(&store).await.unwrap();
    assert!(report.contains("CATEGORIES"));
    assert!(report.contains("No access logs yet. Make some API requests!"));
    assert!(report.contains("Total review versions:  0"));
  }

  #[tokio::test]
  async fn report_covers_reviews_and_logs() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let c = store
      .add_category(NewCategory::new("Books", Some("Books and literature")))
      .await
      .unwrap();
    store
      .record_review(NewReview::new("a", c.id, 3, Some("meh")).labelled("Casual", "Neutral"))
      .await
      .unwrap();
    store
      .record_review(NewReview::new("a", c.id, 4, Some("x".repeat(100).as_str())))
      .await
      .unwrap();
    store.record_access("GET /reviews/trends".into()).await.unwrap();

    let report = render_report(&store).await.unwrap();
    assert!(report.contains("Books"));
    assert!(report.contains("Edits:                  1"));
    assert!(report.contains("Missing tone:           1"));
    assert!(report.contains(&format!("{}...", "x".repeat(PREVIEW_CHARS))));
    assert!(report.contains("GET /reviews/trends"));
    assert!(report.contains("None (pending)"));
  }

  #[test]
  fn preview_keeps_short_text() {
    assert_eq!(preview("short"), "short");
    assert_eq!(bar(0), "");
    assert_eq!(bar(1), "#");
    assert_eq!(bar(10), "#####");
  }
}
