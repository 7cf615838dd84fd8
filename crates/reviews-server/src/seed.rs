//! Sample data for development.
//!
//! Seeding is idempotent at the level of names: categories that already
//! exist and `review_id`s already present in the store are skipped.

use std::collections::HashSet;

use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use rand_core::RngCore;
use reviews_core::{
  category::NewCategory,
  review::{NewReview, MAX_STARS, MIN_STARS},
  store::ReviewStore,
};
use tracing::info;

const CATEGORIES: &[(&str, &str)] = &[
  ("Electronics", "Electronic products and gadgets"),
  ("Books", "Books and literature"),
  ("Clothing", "Apparel and fashion"),
  ("Home & Kitchen", "Home and kitchen items"),
  ("Sports", "Sports and outdoor equipment"),
  ("Toys", "Toys and games"),
];

/// Text, star range, candidate tones and sentiment for one kind of review.
struct Mood {
  texts:     &'static [&'static str],
  stars:     (i64, i64),
  tones:     &'static [&'static str],
  sentiment: &'static str,
}

const MOODS: &[Mood] = &[
  Mood {
    texts:     &[
      "Excellent product! Highly recommend.",
      "Great quality and fast shipping.",
      "Love it! Exactly what I needed.",
      "Outstanding! Will buy again.",
      "Perfect! Exceeded my expectations.",
    ],
    stars:     (8, 10),
    tones:     &["Enthusiastic", "Happy", "Satisfied"],
    sentiment: "Positive",
  },
  Mood {
    texts:     &[
      "It's okay, does the job.",
      "Average product, nothing special.",
      "Decent for the price.",
      "Works as described.",
      "Fine, but could be better.",
    ],
    stars:     (5, 7),
    tones:     &["Neutral", "Professional", "Casual"],
    sentiment: "Neutral",
  },
  Mood {
    texts:     &[
      "Disappointed with the quality.",
      "Not what I expected.",
      "Poor quality, would not recommend.",
      "Broke after a week of use.",
      "Waste of money.",
    ],
    stars:     (1, 4),
    tones:     &["Disappointed", "Angry", "Frustrated"],
    sentiment: "Negative",
  },
];

const UNLABELLED_TEXT: &str = "This product needs AI analysis for tone and sentiment.";
const UNLABELLED_COUNT: i64 = 5;
const EDIT_CHANCE_PERCENT: i64 = 20;

/// What a [`seed`] run added.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
  pub categories_created: usize,
  /// Original versions and edits of labelled reviews.
  pub versions_created:   usize,
  pub unlabelled_created: usize,
}

/// Populate `store` with categories, labelled reviews (some with edits) and a
/// handful of unlabelled reviews for the enrichment path.
///
/// Review timestamps are spread over the 90 days before `now`.
pub async fn seed<S, R>(store: &S, rng: &mut R, now: DateTime<Utc>) -> anyhow::Result<SeedReport>
where
  S: ReviewStore,
  R: RngCore,
{
  let mut report = SeedReport::default();

  let existing: HashSet<String> = store
    .list_categories()
    .await?
    .into_iter()
    .map(|c| c.name)
    .collect();
  for (name, description) in CATEGORIES {
    if !existing.contains(*name) {
      store
        .add_category(NewCategory::new(*name, Some(*description)))
        .await
        .with_context(|| format!("creating category {name:?}"))?;
      report.categories_created += 1;
    }
  }
  info!(created = report.categories_created, "categories seeded");

  let categories = store.list_categories().await?;
  let known_ids: HashSet<String> = store
    .current_reviews(None)
    .await?
    .into_iter()
    .map(|r| r.review_id)
    .collect();

  for category in &categories {
    let slug = category.name.to_lowercase().replace(' ', "_");
    for i in 1..=between(rng, 10, 20) {
      let review_id = format!("review_{slug}_{i}");
      if known_ids.contains(&review_id) {
        continue;
      }

      let mood = pick(rng, MOODS);
      let text = *pick(rng, mood.texts);
      let stars = between(rng, mood.stars.0, mood.stars.1);
      let tone = *pick(rng, mood.tones);
      let created_at = now - Duration::days(between(rng, 1, 90));

      let original = NewReview::new(review_id.as_str(), category.id, stars, Some(text))
        .labelled(tone, mood.sentiment)
        .at(created_at);
      record(store, original).await?;
      report.versions_created += 1;

      if between(rng, 1, 100) <= EDIT_CHANCE_PERCENT {
        for _ in 0..between(rng, 1, 3) {
          let edited_at = (created_at + Duration::days(between(rng, 1, 10))).min(now);
          let edited_stars = (stars + between(rng, -1, 1)).clamp(MIN_STARS, MAX_STARS);
          let edit = NewReview::new(
            review_id.as_str(),
            category.id,
            edited_stars,
            Some(format!("{text} (Edited)").as_str()),
          )
          .labelled(tone, mood.sentiment)
          .at(edited_at);
          record(store, edit).await?;
          report.versions_created += 1;
        }
      }
    }
  }
  info!(created = report.versions_created, "review versions seeded");

  if !categories.is_empty() {
    for i in 1..=UNLABELLED_COUNT {
      let review_id = format!("review_no_analysis_{i}");
      if known_ids.contains(&review_id) {
        continue;
      }
      let category = pick(rng, &categories);
      let stars = between(rng, MIN_STARS, MAX_STARS);
      record(store, NewReview::new(review_id, category.id, stars, Some(UNLABELLED_TEXT)))
        .await?;
      report.unlabelled_created += 1;
    }
  }
  info!(created = report.unlabelled_created, "unlabelled reviews seeded");

  Ok(report)
}

async fn record<S: ReviewStore>(store: &S, review: NewReview) -> anyhow::Result<()> {
  review.validate()?;
  let review_id = review.review_id.clone();
  store
    .record_review(review)
    .await
    .with_context(|| format!("recording review {review_id:?}"))?;
  Ok(())
}

/// Uniform-ish integer in `lo..=hi`. Modulo bias is irrelevant for sample data.
fn between<R: RngCore>(rng: &mut R, lo: i64, hi: i64) -> i64 {
  let span = (hi - lo + 1) as u64;
  lo + (rng.next_u64() % span) as i64
}

fn pick<'a, R: RngCore, T>(rng: &mut R, items: &'a [T]) -> &'a T {
  &items[between(rng, 0, items.len() as i64 - 1) as usize]
}
