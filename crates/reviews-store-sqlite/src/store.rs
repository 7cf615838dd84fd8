//! [`SqliteStore`] — the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use reviews_core::{
  category::{Category, CategoryTrend, NewCategory},
  page::{PageRequest, ReviewPage},
  review::{AccessLog, NewReview, ReviewHistory, ReviewLabels, MAX_STARS, MIN_STARS},
  stats::{CategoryStats, StoreSummary},
  store::ReviewStore,
};

use crate::{
  encode::{category_from_row, decode_dt, encode_dt, raw_review, RawAccessLog, RawReview},
  schema::{CURRENT_REVIEWS_CTE, REVIEW_COLUMNS, SCHEMA},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A review store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a review query whose only parameter is the optional category filter.
  async fn query_reviews(
    &self,
    sql: String,
    category_id: Option<i64>,
  ) -> Result<Vec<ReviewHistory>> {
    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![category_id], raw_review)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  // ── Categories ────────────────────────────────────────────────────────────

  async fn add_category(&self, input: NewCategory) -> Result<Category> {
    let name        = input.name.clone();
    let description = input.description.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO categories (name, description) VALUES (?1, ?2)",
          rusqlite::params![name, description],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from_db)?;

    Ok(Category { id, name: input.name, description: input.description })
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>> {
    let category = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name, description FROM categories WHERE id = ?1",
            rusqlite::params![id],
            category_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(category)
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let categories = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, description FROM categories ORDER BY id")?;
        let rows = stmt
          .query_map([], category_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(categories)
  }

  // ── Reviews — append-only writes ──────────────────────────────────────────

  async fn record_review(&self, input: NewReview) -> Result<ReviewHistory> {
    let created_at = input.created_at.unwrap_or_else(Utc::now);
    let at_str     = encode_dt(created_at);
    let review_id  = input.review_id.clone();
    let text       = input.text.clone();
    let tone       = input.tone.clone();
    let sentiment  = input.sentiment.clone();
    let stars      = input.stars;
    let category   = input.category_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO review_history (
             text, stars, review_id, tone, sentiment, category_id,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![text, stars, review_id, tone, sentiment, category, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from_db)?;

    // Round-trip through the stored encoding so callers see exactly what a
    // later read returns.
    let created_at = decode_dt(&encode_dt(created_at))?;

    Ok(ReviewHistory {
      id,
      review_id:   input.review_id,
      text:        input.text,
      stars:       input.stars,
      category_id: input.category_id,
      tone:        input.tone,
      sentiment:   input.sentiment,
      created_at,
      updated_at:  created_at,
    })
  }

  async fn apply_labels(&self, id: i64, labels: &ReviewLabels) -> Result<bool> {
    let tone      = labels.tone.clone();
    let sentiment = labels.sentiment.clone();
    let at_str    = encode_dt(Utc::now());

    let applied = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM review_history WHERE id = ?1",
            rusqlite::params![id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();

        // Dropping the transaction rolls it back.
        if !exists {
          return Ok(false);
        }

        tx.execute(
          "UPDATE review_history
           SET tone = ?2, sentiment = ?3, updated_at = ?4
           WHERE id = ?1",
          rusqlite::params![id, tone, sentiment, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await
      .map_err(Error::from_db)?;

    Ok(applied)
  }

  // ── Reviews — reads ───────────────────────────────────────────────────────

  async fn get_review(&self, id: i64) -> Result<Option<ReviewHistory>> {
    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM review_history WHERE id = ?1"),
            rusqlite::params![id],
            raw_review,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawReview::into_review).transpose()
  }

  async fn current_reviews(&self, category_id: Option<i64>) -> Result<Vec<ReviewHistory>> {
    let sql = format!(
      "{CURRENT_REVIEWS_CTE}
       SELECT {REVIEW_COLUMNS} FROM current_reviews
       ORDER BY created_at DESC, id DESC"
    );
    self.query_reviews(sql, category_id).await
  }

  async fn category_trends(&self, limit: usize) -> Result<Vec<CategoryTrend>> {
    let limit_val = limit as i64;

    let trends = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "{CURRENT_REVIEWS_CTE}
           SELECT c.id, c.name, c.description,
                  AVG(cur.stars) AS average_stars,
                  COUNT(cur.id)  AS total_reviews
           FROM categories c
           JOIN current_reviews cur ON cur.category_id = c.id
           GROUP BY c.id, c.name, c.description
           ORDER BY average_stars DESC, c.id ASC
           LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![None::<i64>, limit_val], |row| {
            Ok(CategoryTrend {
              id:            row.get(0)?,
              name:          row.get(1)?,
              description:   row.get(2)?,
              average_stars: row.get(3)?,
              total_reviews: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(trends)
  }

  async fn reviews_page(&self, request: &PageRequest) -> Result<ReviewPage> {
    let category_id = request.category_id;
    let cursor      = request.cursor;
    let page_size   = request.page_size;
    let fetch       = (page_size + 1) as i64;

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        // Keyset on (created_at, id): rows strictly after the cursor row in
        // the listing order. An unknown cursor matches nothing.
        let sql = format!(
          "{CURRENT_REVIEWS_CTE}
           SELECT {REVIEW_COLUMNS} FROM current_reviews cur
           WHERE ?2 IS NULL
              OR EXISTS (
                SELECT 1 FROM review_history c
                WHERE c.id = ?2
                  AND (cur.created_at < c.created_at
                       OR (cur.created_at = c.created_at AND cur.id < c.id))
              )
           ORDER BY cur.created_at DESC, cur.id DESC
           LIMIT ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![category_id, cursor, fetch], raw_review)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let rows = raws
      .into_iter()
      .map(RawReview::into_review)
      .collect::<Result<Vec<_>>>()?;

    Ok(ReviewPage::from_overfetch(rows, page_size))
  }

  async fn recent_reviews(&self, limit: usize) -> Result<Vec<ReviewHistory>> {
    let limit_val = limit as i64;

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVIEW_COLUMNS} FROM review_history
           ORDER BY created_at DESC, id DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], raw_review)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }

  // ── Access log ────────────────────────────────────────────────────────────

  async fn record_access(&self, text: String) -> Result<AccessLog> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let text_arg   = text.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO access_logs (text, created_at) VALUES (?1, ?2)",
          rusqlite::params![text_arg, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from_db)?;

    let created_at = decode_dt(&encode_dt(created_at))?;
    Ok(AccessLog { id, text, created_at })
  }

  async fn recent_access_logs(&self, limit: usize) -> Result<Vec<AccessLog>> {
    let limit_val = limit as i64;

    let raws: Vec<RawAccessLog> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, text, created_at FROM access_logs
           ORDER BY created_at DESC, id DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(RawAccessLog {
              id:         row.get(0)?,
              text:       row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccessLog::into_access_log).collect()
  }

  // ── Inspection ────────────────────────────────────────────────────────────

  async fn category_stats(&self) -> Result<Vec<CategoryStats>> {
    let stats = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.id, c.name, c.description,
                  COUNT(r.id),
                  COUNT(DISTINCT r.review_id),
                  AVG(r.stars)
           FROM categories c
           LEFT JOIN review_history r ON r.category_id = c.id
           GROUP BY c.id, c.name, c.description
           ORDER BY c.id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CategoryStats {
              category:                   category_from_row(row)?,
              total_versions:             row.get(3)?,
              logical_reviews:            row.get(4)?,
              average_stars_all_versions: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(stats)
  }

  async fn summary(&self) -> Result<StoreSummary> {
    let summary = self
      .conn
      .call(|conn| {
        let (total_versions, logical_reviews, missing_tone, missing_sentiment) = conn
          .query_row(
            "SELECT COUNT(*),
                    COUNT(DISTINCT review_id),
                    COALESCE(SUM(CASE WHEN tone IS NULL THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN sentiment IS NULL THEN 1 ELSE 0 END), 0)
             FROM review_history",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )?;

        let mut stmt =
          conn.prepare("SELECT stars, COUNT(*) FROM review_history GROUP BY stars")?;
        let counted = stmt
          .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let stars_distribution = (MIN_STARS..=MAX_STARS)
          .map(|stars| {
            let count = counted
              .iter()
              .find(|(s, _)| *s == stars)
              .map_or(0, |(_, c)| *c);
            (stars, count)
          })
          .collect();

        let mut stmt = conn.prepare(
          "SELECT sentiment, COUNT(*) FROM review_history
           GROUP BY sentiment
           ORDER BY sentiment",
        )?;
        let sentiment_distribution: Vec<(Option<String>, i64)> = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(StoreSummary {
          total_versions,
          logical_reviews,
          missing_tone,
          missing_sentiment,
          stars_distribution,
          sentiment_distribution,
        })
      })
      .await?;
    Ok(summary)
  }
}
