//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (git, linter subprocesses,
//! AI provider HTTP, GitHub REST).

pub mod ai;
pub mod changeset;
pub mod context;
pub mod event;
pub mod github;
pub mod lint;

use anyhow::{Context, Result};
use std::time::Duration;

/// Shared reqwest client builder for the outbound API integrations.
///
/// Proxy discovery is disabled for loopback base URLs so a proxy in the CI
/// environment cannot intercept calls to local test servers.
pub(crate) fn http_client(base_url: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));
    if is_loopback_base_url(base_url) {
        builder = builder.no_proxy();
    }
    builder.build().context("failed to build HTTP client")
}

fn is_loopback_base_url(base_url: &str) -> bool {
    base_url.contains("://127.0.0.1")
        || base_url.contains("://localhost")
        || base_url.contains("://[::1]")
}

/// Clip `value` to at most `max_len` characters, marking the cut with `...`.
pub(crate) fn truncate_text(value: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if value.chars().count() <= max_len {
        return value.to_string();
    }

    let mut out = value
        .chars()
        .take(max_len.saturating_sub(3))
        .collect::<String>();
    out.push_str("...");
    out
}
