//! Pull request event payload as written by the CI runner.

use crate::domain::ContextError;
use serde::Deserialize;
use std::path::Path;

/// The slice of the webhook event this tool needs. Unknown fields in the
/// payload are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub head: CommitRef,
    pub base: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    pull_request: Option<PullRequestEvent>,
}

/// Load and parse the event file the runner points `GITHUB_EVENT_PATH` at.
///
/// Any failure here is fatal for the run: without a pull request number and
/// head SHA there is nothing to review or comment on.
pub fn load_event(path: &Path) -> Result<PullRequestEvent, ContextError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContextError::EventUnreadable {
        path: path.display().to_string(),
        source,
    })?;

    let envelope: EventEnvelope = serde_json::from_str(&raw)?;
    envelope
        .pull_request
        .ok_or(ContextError::NotAPullRequestEvent)
}
