//! AI code analysis through one of several completion providers.

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::config::{self, AiSettings, ReviewConfig};
use crate::domain::{IssueOrigin, ReviewIssue};
use crate::infra::context::Credentials;
use crate::prompts;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;

/// Seconds an AI completion call may take end to end.
const COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Issue label used when the AI call itself failed.
pub const AI_ERROR_LABEL: &str = "AI Review Error";

/// A model endpoint that can turn a review prompt into feedback text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name, interpolated into the `AI Review (<name>)`
    /// issue label.
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Pick the provider for this run: the first of OpenAI, Anthropic, Gemini
/// whose credential is configured. Exactly one provider reviews each file;
/// there is no fan-out and no cross-provider fallback on failure.
pub fn select_provider(
    credentials: &Credentials,
    settings: &AiSettings,
) -> Result<Option<Box<dyn CompletionProvider>>> {
    if let Some(key) = &credentials.openai_api_key {
        return Ok(Some(Box::new(OpenAiProvider::new(key.clone(), settings)?)));
    }
    if let Some(key) = &credentials.anthropic_api_key {
        return Ok(Some(Box::new(AnthropicProvider::new(key.clone(), settings)?)));
    }
    if let Some(key) = &credentials.google_api_key {
        return Ok(Some(Box::new(GeminiProvider::new(key.clone(), settings)?)));
    }
    Ok(None)
}

/// Ask the configured AI provider to review one file.
///
/// With no credential configured this returns nothing. A successful call
/// with feedback text becomes one `AI Review (<provider>)` issue; any
/// failure becomes one `AI Review Error` issue so the run continues and the
/// failure is still visible on the pull request.
pub async fn analyze_code(
    path: &Path,
    content: &str,
    config: &ReviewConfig,
    credentials: &Credentials,
) -> Vec<ReviewIssue> {
    let provider = match select_provider(credentials, &config.ai) {
        Ok(Some(provider)) => provider,
        Ok(None) => return Vec::new(),
        Err(err) => return error_issue(&err),
    };

    analyze_with(provider.as_ref(), path, content, config).await
}

/// [`analyze_code`] with an explicit provider. This is the seam tests use.
pub async fn analyze_with(
    provider: &dyn CompletionProvider,
    path: &Path,
    content: &str,
    config: &ReviewConfig,
) -> Vec<ReviewIssue> {
    let prompt = match build_prompt(path, content, config) {
        Ok(prompt) => prompt,
        Err(err) => return error_issue(&err),
    };

    match provider.complete(&prompt).await {
        Ok(feedback) => {
            let label = format!("AI Review ({})", provider.name());
            ReviewIssue::new(IssueOrigin::AiReview, label, feedback)
                .into_iter()
                .collect()
        }
        Err(err) => error_issue(&err),
    }
}

fn error_issue(err: &anyhow::Error) -> Vec<ReviewIssue> {
    log::warn!("AI review failed: {err:#}");
    ReviewIssue::new(IssueOrigin::AiReviewError, AI_ERROR_LABEL, format!("{err:#}"))
        .into_iter()
        .collect()
}

/// Render the review prompt for one file: path, syntax hint and content
/// plus the analysis instructions, then the language-specific suffix.
fn build_prompt(path: &Path, content: &str, config: &ReviewConfig) -> Result<String> {
    let instructions = config
        .ai
        .custom_prompt
        .as_deref()
        .unwrap_or(prompts::REVIEW_RUBRIC);

    let base = prompts::render(
        "review_file",
        &json!({
            "path": path.display().to_string(),
            "syntax_hint": syntax_hint(path),
            "content": content,
            "instructions": instructions,
        }),
    )?;

    Ok(config::customize_prompt(prompt_language(path), &base))
}

/// Extension without the dot, used as the fenced-code-block language tag.
fn syntax_hint(path: &Path) -> &str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or("text")
}

/// Language key for the prompt suffix table.
fn prompt_language(path: &Path) -> &str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("py") => "python",
        Some("js" | "jsx") => "javascript",
        Some("ts" | "tsx") => "typescript",
        Some(other) => other,
        None => "",
    }
}
