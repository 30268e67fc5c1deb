//! Gemini text-generation client used for broadcast message drafting.
//!
//! Requires the GEMINI_API_KEY environment variable; the model name is
//! configurable via GEMINI_MODEL.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{prelude::*, state::Config};

pub const BASE_URL: &str =
  "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
  contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
  #[serde(default)]
  text: String,
}

#[derive(Clone)]
pub struct Gemini {
  client: Client,
  base_url: String,
  api_key: String,
  model: String,
}

impl Gemini {
  pub fn from_config(client: &Client, config: &Config) -> Result<Self> {
    let api_key = config.gemini_api_key.clone().ok_or_else(|| {
      Error::Gemini("GEMINI_API_KEY is not configured on the server".into())
    })?;

    Ok(Self {
      client: client.clone(),
      base_url: BASE_URL.into(),
      api_key,
      model: config.gemini_model.clone(),
    })
  }

  pub async fn generate(&self, prompt: &str) -> Result<String> {
    let url = format!(
      "{}/{}:generateContent?key={}",
      self.base_url, self.model, self.api_key
    );

    let body = GenerateRequest {
      contents: vec![Content { parts: vec![Part { text: prompt }] }],
    };

    let response = self
      .client
      .post(&url)
      .json(&body)
      .send()
      .await
      .map_err(|e| Error::Gemini(format!("Request failed: {e}")))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(Error::Gemini(format!("{status}: {detail}")));
    }

    let parsed: GenerateResponse = response
      .json()
      .await
      .map_err(|e| Error::Gemini(format!("Failed to parse response: {e}")))?;

    extract_text(parsed)
  }
}

fn extract_text(response: GenerateResponse) -> Result<String> {
  let text = response
    .candidates
    .into_iter()
    .next()
    .map(|c| {
      c.content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("")
    })
    .unwrap_or_default();

  if text.is_empty() {
    return Err(Error::Gemini("Empty completion".into()));
  }

  Ok(text)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_text_joins_parts() {
    let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Halo "},{"text":"Kak!"}]}}]}"#;
    let parsed: GenerateResponse = json::from_str(raw).unwrap();
    assert_eq!(extract_text(parsed).unwrap(), "Halo Kak!");
  }

  #[test]
  fn test_extract_text_rejects_empty() {
    let raw = r#"{"candidates":[]}"#;
    let parsed: GenerateResponse = json::from_str(raw).unwrap();
    assert!(matches!(extract_text(parsed), Err(Error::Gemini(_))));
  }
}
