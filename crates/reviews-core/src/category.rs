//! Categories group reviews. They are created by the seeding process and are
//! not modified afterwards.

use serde::{Deserialize, Serialize};

/// A named review category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          i64,
  /// Unique across all categories.
  pub name:        String,
  pub description: Option<String>,
}

/// Input to [`crate::store::ReviewStore::add_category`].
#[derive(Debug, Clone)]
pub struct NewCategory {
  pub name:        String,
  pub description: Option<String>,
}

impl NewCategory {
  pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
    Self { name: name.into(), description: description.map(str::to_owned) }
  }
}

/// A category ranked by the mean star rating of its current reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
  pub id:            i64,
  pub name:          String,
  pub description:   Option<String>,
  pub average_stars: f64,
  pub total_reviews: i64,
}
