//! Google Gemini generateContent provider.

use super::{COMPLETION_TIMEOUT_SECS, CompletionProvider};
use crate::config::AiSettings;
use crate::infra::{http_client, truncate_text};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-pro";

pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl GeminiProvider {
    pub fn new(api_key: String, settings: &AiSettings) -> Result<Self> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: String,
        settings: &AiSettings,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Ok(Self {
            client: http_client(&base_url, COMPLETION_TIMEOUT_SECS)?,
            base_url,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        // Gemini authenticates with the key in the query string.
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{"text": prompt}]
                    }
                ],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens,
                }
            }))
            .send()
            .await
            .context("failed to call Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!(
                "Gemini API request failed: HTTP {} {}",
                status,
                truncate_text(&body, 300)
            );
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("failed to decode Gemini response")?;

        let text = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|candidate| {
                candidate
                    .content
                    .and_then(|content| content.parts)
                    .unwrap_or_default()
            })
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            bail!("Gemini API returned no text content");
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn provider(base_url: &str) -> GeminiProvider {
        GeminiProvider::with_base_url("g-key".to_string(), &AiSettings::default(), base_url)
            .expect("build provider")
    }

    #[tokio::test]
    async fn joins_all_candidate_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"part one"},{"text":"part two"}]}}]}"#,
            )
            .create_async()
            .await;

        let out = provider(&server.url())
            .complete("review this")
            .await
            .expect("completion");
        mock.assert_async().await;
        assert_eq!(out, "part one\npart two");
    }

    #[tokio::test]
    async fn missing_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete("review this")
            .await
            .expect_err("empty response should fail");
        assert!(err.to_string().contains("no text content"));
    }

    #[tokio::test]
    async fn http_error_is_reported_with_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete("review this")
            .await
            .expect_err("429 should fail");
        assert!(err.to_string().contains("Gemini API request failed"));
    }
}
