//! The sequential review pipeline.
//!
//! One pass over the change set: filter, lint, AI-review, publish. Every
//! external failure inside the loop degrades to a log line or a synthetic
//! issue; nothing here aborts the run.

use crate::config::ReviewConfig;
use crate::domain::{FileReview, RunTotals};
use crate::infra::ai;
use crate::infra::changeset;
use crate::infra::context::RunContext;
use crate::infra::github::GitHubClient;
use crate::infra::lint;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::Path;

/// Summary body for a run that found nothing.
const NO_ISSUES_BODY: &str = "✅ Code review completed - no issues found!";

/// Review the pull request checked out in the current working directory.
pub async fn run_review(context: &RunContext, config: &ReviewConfig, github: &GitHubClient) {
    run_review_in(Path::new("."), context, config, github).await
}

/// [`run_review`] against an explicit repository checkout.
pub async fn run_review_in(
    repo_dir: &Path,
    context: &RunContext,
    config: &ReviewConfig,
    github: &GitHubClient,
) {
    log::info!("Starting code review of {}", context.repository);

    let changed = changeset::changed_files_in(repo_dir).await;
    if changed.is_empty() {
        log::info!("No changed files found");
        return;
    }

    let filter = PathFilter::new(config);
    let number = context.event.number;
    let head_sha = context.event.head.sha.as_str();
    let posted = existing_bodies(github, number).await;
    let mut totals = RunTotals::default();

    for path in &changed {
        let full_path = repo_dir.join(path);
        let meta = match tokio::fs::metadata(&full_path).await {
            Ok(meta) => meta,
            Err(_) => {
                log::debug!("Skipping {path}: no longer on disk");
                continue;
            }
        };
        if !filter.should_review(path) {
            log::info!("Skipping {path} (excluded by patterns)");
            continue;
        }
        if meta.len() > config.max_file_size {
            log::warn!("Skipping {path} (too large: {} bytes)", meta.len());
            continue;
        }
        let content = match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Skipping {path}: {err}");
                continue;
            }
        };

        log::info!("Reviewing {path}");
        let mut review = FileReview::new(path.clone());
        review.issues.extend(lint::run_linters(&full_path, config).await);
        review.issues.extend(
            ai::analyze_code(Path::new(path), &content, config, &context.credentials).await,
        );
        totals.record(&review);

        if review.has_issues() {
            let body = render_file_comment(&review);
            if posted.contains(&body) {
                log::info!("Skipping duplicate comment for {path}");
                continue;
            }
            if let Err(err) = github
                .create_review_comment(number, &body, head_sha, path, 1)
                .await
            {
                log::warn!("Error posting comment for {path}: {err}");
            }
        }
    }

    let summary = render_summary(&totals);
    if posted.contains(&summary) {
        log::info!("Skipping duplicate summary review");
        return;
    }
    if let Err(err) = github.create_review(number, &summary).await {
        log::warn!("Error posting summary review: {err}");
    }
}

/// Include/exclude pattern matching over repo-relative paths.
struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl PathFilter {
    fn new(config: &ReviewConfig) -> Self {
        Self {
            include: build_glob_set(&config.include_patterns),
            exclude: build_glob_set(&config.exclude_patterns),
        }
    }

    /// A file is reviewed when an include pattern matches it and no
    /// exclude pattern does.
    fn should_review(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }
}

/// Patterns match the whole repo-relative path. `*` crosses directory
/// separators, so `*.py` matches at any depth.
fn build_glob_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(false).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => log::warn!("Skipping invalid file pattern {pattern:?}: {err}"),
        }
    }
    builder.build().unwrap_or_else(|err| {
        log::warn!("File pattern set failed to build: {err}");
        GlobSet::empty()
    })
}

/// Bodies already present on the pull request, fetched once per run.
/// A failed listing degrades to empty so posting still proceeds.
async fn existing_bodies(github: &GitHubClient, number: u64) -> HashSet<String> {
    let mut bodies = HashSet::new();
    match github.list_review_comments(number).await {
        Ok(list) => bodies.extend(list),
        Err(err) => log::warn!("Could not list existing review comments: {err}"),
    }
    match github.list_reviews(number).await {
        Ok(list) => bodies.extend(list),
        Err(err) => log::warn!("Could not list existing reviews: {err}"),
    }
    bodies
}

fn render_file_comment(review: &FileReview) -> String {
    let issues = review
        .issues
        .iter()
        .map(|issue| issue.markdown())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("## Code Review for {}\n\n{}", review.path, issues)
}

fn render_summary(totals: &RunTotals) -> String {
    if totals.total_issues() == 0 {
        return NO_ISSUES_BODY.to_string();
    }
    format!(
        "## Code Review Summary\n\n\
         Found {} issues across {} files.\n\n\
         ### Key Findings:\n\
         - Linter issues: {}\n\
         - AI analysis issues: {}\n\n\
         Please review the detailed comments above and address the identified issues.",
        totals.total_issues(),
        totals.files_reviewed,
        totals.lint_issues,
        totals.ai_issues
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueOrigin, ReviewIssue};

    #[test]
    fn default_patterns_review_source_at_any_depth() {
        let filter = PathFilter::new(&ReviewConfig::default());
        assert!(filter.should_review("app.py"));
        assert!(filter.should_review("src/deep/nested/app.py"));
        assert!(filter.should_review("web/index.tsx"));
        assert!(!filter.should_review("README.md"));
        assert!(!filter.should_review("bundle.min.js"));
        assert!(!filter.should_review("node_modules/left-pad/index.js"));
    }

    #[test]
    fn invalid_patterns_are_skipped_not_fatal() {
        let mut config = ReviewConfig::default();
        config.include_patterns = vec!["[".to_string(), "*.py".to_string()];
        let filter = PathFilter::new(&config);
        assert!(filter.should_review("app.py"));
        assert!(!filter.should_review("app.js"));
    }

    #[test]
    fn file_comment_has_heading_and_issue_paragraphs() {
        let mut review = FileReview::new("src/app.py");
        review.issues.push(
            ReviewIssue::new(IssueOrigin::Linter, "pylint", "C0301 line too long").unwrap(),
        );
        review.issues.push(
            ReviewIssue::new(IssueOrigin::AiReview, "AI Review (OpenAI)", "Looks risky").unwrap(),
        );

        let body = render_file_comment(&review);
        assert!(body.starts_with("## Code Review for src/app.py\n\n"));
        assert!(
            body.contains("**pylint**: C0301 line too long\n\n**AI Review (OpenAI)**: Looks risky")
        );
    }

    #[test]
    fn clean_run_summary_is_the_fixed_message() {
        let totals = RunTotals::default();
        assert_eq!(render_summary(&totals), NO_ISSUES_BODY);
    }

    #[test]
    fn summary_reports_totals_and_per_category_counts() {
        let totals = RunTotals {
            files_reviewed: 3,
            lint_issues: 2,
            ai_issues: 1,
        };
        let body = render_summary(&totals);
        assert!(body.starts_with("## Code Review Summary"));
        assert!(body.contains("Found 3 issues across 3 files."));
        assert!(body.contains("- Linter issues: 2"));
        assert!(body.contains("- AI analysis issues: 1"));
        assert!(body.ends_with("address the identified issues."));
    }
}
