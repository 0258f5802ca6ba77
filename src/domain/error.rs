//! Domain error types for the review agent.
//!
//! Only the fatal class of failures lives here: broken CI inputs that must
//! stop the run with a non-zero exit. Everything recoverable (linter
//! failures, AI call failures, publish failures) is converted into issues or
//! log lines at the call site and never propagates as an error.

use thiserror::Error;

/// Errors reading the CI environment the run depends on.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("reading event payload {path} failed: {source}")]
    EventUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("event payload is not valid JSON: {0}")]
    EventMalformed(#[from] serde_json::Error),

    #[error("event payload has no pull_request object")]
    NotAPullRequestEvent,
}

/// Errors talking to the hosting platform's REST API.
///
/// The orchestrator logs these instead of propagating them, since a failed
/// comment must not abort the run. They stay typed so tests can assert on
/// the failure class.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API error: {0}")]
    Api(String),
}
