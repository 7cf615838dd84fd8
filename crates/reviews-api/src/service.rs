//! Service-level endpoints: capability description and liveness.

use axum::Json;
use serde_json::{Value, json};

/// `GET /`
pub async fn root() -> Json<Value> {
  Json(json!({
    "message": "Reviews API",
    "endpoints": {
      "trends": "/reviews/trends",
      "reviews_by_category": "/reviews/?category_id=<category_id>",
    },
  }))
}

/// `GET /health` — healthy whenever the process can answer.
pub async fn health() -> Json<Value> { Json(json!({ "status": "healthy" })) }
