//! The external text-analysis capability used for enrichment.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A text-completion backend: one prompt in, plain text out.
pub trait Analyzer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn complete<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

// ─── Anthropic Messages API ──────────────────────────────────────────────────

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 100;

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
  model:      &'a str,
  max_tokens: u32,
  messages:   [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  text: Option<String>,
}

/// [`Analyzer`] backed by the Anthropic Messages API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AnthropicAnalyzer {
  client:  Client,
  api_key: String,
  model:   String,
}

impl AnthropicAnalyzer {
  pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(60))
      .build()?;
    Ok(Self { client, api_key: api_key.into(), model: model.into() })
  }

  pub fn model(&self) -> &str { &self.model }
}

impl Analyzer for AnthropicAnalyzer {
  type Error = Error;

  async fn complete(&self, prompt: &str) -> Result<String> {
    let request = MessageRequest {
      model:      &self.model,
      max_tokens: MAX_TOKENS,
      messages:   [Message { role: "user", content: prompt }],
    };

    let response = self
      .client
      .post(MESSAGES_URL)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await?;
      return Err(Error::Api(format!("{status}: {body}")));
    }

    let message: MessageResponse = response.json().await?;
    message
      .content
      .into_iter()
      .find_map(|block| block.text)
      .ok_or(Error::EmptyResponse)
  }
}
