//! OpenAI chat-completions provider.

use super::{COMPLETION_TIMEOUT_SECS, CompletionProvider};
use crate::config::AiSettings;
use crate::infra::{http_client, truncate_text};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// System message sent with every review request.
const SYSTEM_PROMPT: &str = "You are an expert code reviewer. Provide clear, actionable feedback.";

pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(api_key: String, settings: &AiSettings) -> Result<Self> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// Point the provider at a different endpoint (tests, gateways).
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
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": prompt}
                ],
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
            }))
            .send()
            .await
            .context("failed to call OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!(
                "OpenAI API request failed: HTTP {} {}",
                status,
                truncate_text(&body, 300)
            );
        }

        let parsed: ChatCompletionsResponse = response
            .json()
            .await
            .context("failed to decode chat completions response")?;

        // A response with no choices is a failed call, not empty feedback.
        let Some(choice) = parsed.choices.into_iter().next() else {
            bail!("OpenAI API returned no choices");
        };

        Ok(choice.message.content)
    }
}
