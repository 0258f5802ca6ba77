//! External linter execution.

use crate::config::ReviewConfig;
use crate::domain::{IssueOrigin, ReviewIssue};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Linters per extension class, with the flags that turn them into
/// check-only commands. The target path is appended last.
const PYTHON_LINTERS: &[(&str, &[&str])] = &[
    ("pylint", &[]),
    ("flake8", &[]),
    ("black", &["--check"]),
    ("isort", &["--check-only"]),
];

const JS_LINTERS: &[(&str, &[&str])] = &[("eslint", &[]), ("prettier", &["--check"])];

/// Outcome of one linter invocation, mapped to issues by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// Exit 0, nothing to report.
    Clean,
    /// Non-zero exit; carries the captured output.
    Findings(String),
    /// Killed after the configured timeout.
    TimedOut,
    /// Binary not found on PATH.
    MissingTool,
}

/// Run every enabled linter that applies to `path` and collect their
/// findings as issues.
///
/// Unrecognized extensions yield no issues. A missing binary is skipped
/// without comment so repositories without the full toolchain still get
/// reviewed by whatever is installed. One linter failing, timing out or
/// being absent never stops the others.
pub async fn run_linters(path: &Path, config: &ReviewConfig) -> Vec<ReviewIssue> {
    let mut issues = Vec::new();

    for (name, check_args) in linters_for(path) {
        let Some(settings) = config.enabled_linter(name) else {
            continue;
        };

        let outcome = run_one(
            name,
            check_args,
            &settings.extra_args,
            settings.timeout_secs,
            path,
        )
        .await;

        match outcome {
            LintOutcome::Clean | LintOutcome::MissingTool => {}
            LintOutcome::TimedOut => {
                log::warn!(
                    "{name} timed out after {}s on {}",
                    settings.timeout_secs,
                    path.display()
                );
                if let Some(issue) = ReviewIssue::new(IssueOrigin::Linter, *name, "Timeout") {
                    issues.push(issue);
                }
            }
            LintOutcome::Findings(body) => {
                if let Some(issue) = ReviewIssue::new(IssueOrigin::Linter, *name, body) {
                    issues.push(issue);
                }
            }
        }
    }

    issues
}

fn linters_for(path: &Path) -> &'static [(&'static str, &'static [&'static str])] {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("py") => PYTHON_LINTERS,
        Some("js" | "ts" | "jsx" | "tsx") => JS_LINTERS,
        _ => &[],
    }
}

async fn run_one(
    name: &str,
    check_args: &[&str],
    extra_args: &[String],
    timeout_secs: u64,
    path: &Path,
) -> LintOutcome {
    let Ok(binary) = which::which(name) else {
        return LintOutcome::MissingTool;
    };

    let mut command = Command::new(binary);
    command
        .args(check_args)
        .args(extra_args)
        .arg(path)
        .kill_on_drop(true);

    let waited = tokio::time::timeout(Duration::from_secs(timeout_secs), command.output()).await;

    match waited {
        Err(_) => LintOutcome::TimedOut,
        Ok(Err(err)) => {
            log::warn!("could not run {name}: {err}");
            LintOutcome::MissingTool
        }
        Ok(Ok(output)) if output.status.success() => LintOutcome::Clean,
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let body = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout)
            } else {
                stderr
            };
            LintOutcome::Findings(body.trim_end().to_string())
        }
    }
}
