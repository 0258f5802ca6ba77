use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a review issue came from.
///
/// The origin drives the per-category counts in the summary comment; it is
/// carried on the issue instead of being re-derived from label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueOrigin {
    /// Produced by an external linter process.
    Linter,
    /// Produced by a successful AI review call.
    AiReview,
    /// Produced in place of a failed AI review call.
    AiReviewError,
}

impl IssueOrigin {
    /// Whether this issue counts towards the AI column of the summary.
    /// Failed AI calls are still AI findings as far as the counts go.
    pub fn is_ai(&self) -> bool {
        matches!(self, Self::AiReview | Self::AiReviewError)
    }
}

impl fmt::Display for IssueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linter => write!(f, "linter"),
            Self::AiReview => write!(f, "ai_review"),
            Self::AiReviewError => write!(f, "ai_review_error"),
        }
    }
}

impl FromStr for IssueOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linter" => Ok(Self::Linter),
            "ai_review" => Ok(Self::AiReview),
            "ai_review_error" => Ok(Self::AiReviewError),
            other => Err(format!("unknown issue origin: {other}")),
        }
    }
}

/// One labeled piece of review feedback for a file.
///
/// The label is the tool that produced it (a linter name, or the AI review
/// marker); the body is free-form text. There is no severity and no real
/// line anchor; comments are pinned to a placeholder line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewIssue {
    pub origin: IssueOrigin,
    pub label: String,
    pub body: String,
}

impl ReviewIssue {
    /// Build an issue, refusing blank bodies so empty lint/AI output can
    /// never surface as an empty comment paragraph.
    pub fn new(
        origin: IssueOrigin,
        label: impl Into<String>,
        body: impl Into<String>,
    ) -> Option<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            return None;
        }
        Some(Self {
            origin,
            label: label.into(),
            body,
        })
    }

    /// Render the issue as one `**label**: body` markdown paragraph.
    pub fn markdown(&self) -> String {
        format!("**{}**: {}", self.label, self.body)
    }
}

/// All issues found for a single changed file.
///
/// Built once per file and handed straight to the publisher; nothing is
/// persisted between runs.
#[derive(Debug, Clone, Default)]
pub struct FileReview {
    pub path: String,
    pub issues: Vec<ReviewIssue>,
}

impl FileReview {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            issues: Vec::new(),
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Counters accumulated across the whole run for the summary comment.
/// Appended to in file order; no synchronization is needed because the run
/// is strictly sequential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Files that were actually reviewed (present on disk and included).
    pub files_reviewed: usize,
    pub lint_issues: usize,
    pub ai_issues: usize,
}

impl RunTotals {
    pub fn record(&mut self, review: &FileReview) {
        self.files_reviewed += 1;
        for issue in &review.issues {
            if issue.origin.is_ai() {
                self.ai_issues += 1;
            } else {
                self.lint_issues += 1;
            }
        }
    }

    pub fn total_issues(&self) -> usize {
        self.lint_issues + self.ai_issues
    }
}
