//! Anthropic messages-API provider.

use super::{COMPLETION_TIMEOUT_SECS, CompletionProvider};
use crate::config::AiSettings;
use crate::infra::{http_client, truncate_text};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
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
        })
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "Claude"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).context("invalid anthropic api key header")?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "messages": [
                    {"role": "user", "content": prompt}
                ]
            }))
            .send()
            .await
            .context("failed to call Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!(
                "Anthropic API request failed: HTTP {} {}",
                status,
                truncate_text(&body, 300)
            );
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("failed to decode Anthropic messages response")?;

        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            bail!("Anthropic API returned no text content");
        }

        Ok(text)
    }
}
