//! Prompt construction and reply parsing for tone/sentiment enrichment.

use reviews_core::review::ReviewLabels;

/// The fixed instruction sent to the analyser for one review.
pub fn analysis_prompt(text: &str, stars: i64) -> String {
  format!(
    "Analyze the following review and provide both the tone and sentiment.

Review Text: \"{text}\"
Star Rating: {stars}/10

Please respond in the following exact format:
Tone: [one word describing the tone, e.g., Professional, Casual, Enthusiastic, Disappointed, Angry, Happy, Neutral]
Sentiment: [one word: Positive, Negative, or Neutral]

Keep your response concise with just these two lines."
  )
}

/// Pick the `Tone:` and `Sentiment:` lines out of an analyser reply.
///
/// Other lines are ignored. A missing line leaves its label unset; a repeated
/// one keeps the last value.
pub fn parse_labels(reply: &str) -> ReviewLabels {
  let mut labels = ReviewLabels::default();
  for line in reply.trim().lines() {
    if let Some(rest) = line.strip_prefix("Tone:") {
      labels.tone = Some(rest.trim().to_owned());
    } else if let Some(rest) = line.strip_prefix("Sentiment:") {
      labels.sentiment = Some(rest.trim().to_owned());
    }
  }
  labels
}
