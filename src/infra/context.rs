//! Run context assembled once from the CI environment.

use crate::domain::ContextError;
use crate::infra::event::{self, PullRequestEvent};
use std::path::Path;

/// Optional AI provider keys. Which keys are present decides which provider
/// performs the review; none present means the AI pass is skipped.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
}

impl Credentials {
    pub fn any(&self) -> bool {
        self.openai_api_key.is_some()
            || self.anthropic_api_key.is_some()
            || self.google_api_key.is_some()
    }
}

/// Everything the run needs from the CI environment.
///
/// Read once at startup and passed explicitly to every component; nothing
/// else in the crate touches environment variables.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub github_token: String,
    /// `owner/repo` as provided by the runner.
    pub repository: String,
    pub event: PullRequestEvent,
    pub credentials: Credentials,
}

impl RunContext {
    /// Read the runner environment. Missing required variables or an
    /// unreadable/malformed event payload are fatal.
    pub fn from_env() -> Result<Self, ContextError> {
        let github_token = required("GITHUB_TOKEN")?;
        let repository = required("GITHUB_REPOSITORY")?;
        let event_path = required("GITHUB_EVENT_PATH")?;
        let event = event::load_event(Path::new(&event_path))?;

        Ok(Self {
            github_token,
            repository,
            event,
            credentials: Credentials {
                openai_api_key: optional("OPENAI_API_KEY"),
                anthropic_api_key: optional("ANTHROPIC_API_KEY"),
                google_api_key: optional("GOOGLE_API_KEY"),
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ContextError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ContextError::MissingVar(name)),
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
