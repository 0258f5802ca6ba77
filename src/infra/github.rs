//! GitHub REST client for publishing review feedback on a pull request.
//!
//! Only the four pull-request endpoints the agent needs are wrapped: the
//! two POSTs that publish feedback and the two GETs used to skip feedback
//! that an earlier run already posted.

use crate::domain::PublishError;
use crate::infra::{http_client, truncate_text};
use anyhow::Result;
use reqwest::header;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("revue/", env!("CARGO_PKG_VERSION"));
const LIST_PER_PAGE: usize = 100;

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    repository: String,
}

#[derive(Debug, Deserialize)]
struct FeedbackBody {
    body: Option<String>,
}

impl GitHubClient {
    /// `repository` is the `owner/repo` slug from the runner environment.
    pub fn new(token: String, repository: String) -> Result<Self> {
        Self::with_base_url(token, repository, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        token: String,
        repository: String,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Ok(Self {
            client: http_client(&base_url, REQUEST_TIMEOUT_SECS)?,
            base_url,
            token,
            repository,
        })
    }

    fn pulls_url(&self, number: u64, tail: &str) -> String {
        format!(
            "{}/repos/{}/pulls/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.repository,
            number,
            tail
        )
    }

    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), PublishError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(format!(
                "HTTP {} {}",
                status,
                truncate_text(&body, 300)
            )));
        }

        Ok(())
    }

    /// Fetch every page of a listing endpoint and keep the non-blank
    /// bodies. Pages are followed until one comes back short, so long
    /// comment threads are listed in full.
    async fn get_bodies(&self, url: &str) -> Result<Vec<String>, PublishError> {
        let mut bodies = Vec::new();

        for page in 1u32.. {
            let page_query = [
                ("per_page", LIST_PER_PAGE.to_string()),
                ("page", page.to_string()),
            ];
            let response = self
                .client
                .get(url)
                .query(&page_query)
                .bearer_auth(&self.token)
                .header(header::ACCEPT, GITHUB_ACCEPT)
                .header(header::USER_AGENT, USER_AGENT)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(PublishError::Api(format!(
                    "HTTP {} {}",
                    status,
                    truncate_text(&body, 300)
                )));
            }

            let entries: Vec<FeedbackBody> = response.json().await?;
            let fetched = entries.len();
            bodies.extend(
                entries
                    .into_iter()
                    .filter_map(|entry| entry.body)
                    .filter(|body| !body.trim().is_empty()),
            );
            if fetched < LIST_PER_PAGE {
                break;
            }
        }

        Ok(bodies)
    }

    /// Post one review comment anchored to a line of `path` at `commit_id`.
    pub async fn create_review_comment(
        &self,
        number: u64,
        body: &str,
        commit_id: &str,
        path: &str,
        line: u32,
    ) -> Result<(), PublishError> {
        let payload = json!({
            "body": body,
            "commit_id": commit_id,
            "path": path,
            "line": line,
        });
        self.post(&self.pulls_url(number, "comments"), &payload)
            .await
    }

    /// Post one non-blocking (`COMMENT`) review with an overall body.
    pub async fn create_review(&self, number: u64, body: &str) -> Result<(), PublishError> {
        let payload = json!({
            "event": "COMMENT",
            "body": body,
        });
        self.post(&self.pulls_url(number, "reviews"), &payload).await
    }

    /// Bodies of the existing review comments on the pull request.
    pub async fn list_review_comments(&self, number: u64) -> Result<Vec<String>, PublishError> {
        self.get_bodies(&self.pulls_url(number, "comments")).await
    }

    /// Bodies of the existing reviews. Blank bodies (plain approvals) are
    /// dropped.
    pub async fn list_reviews(&self, number: u64) -> Result<Vec<String>, PublishError> {
        self.get_bodies(&self.pulls_url(number, "reviews")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: &str) -> GitHubClient {
        GitHubClient::with_base_url("t-123".to_string(), "octo/demo".to_string(), base_url)
            .expect("build client")
    }

    #[tokio::test]
    async fn review_comment_is_anchored_to_path_and_commit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repos/octo/demo/pulls/7/comments")
            .match_header("authorization", "Bearer t-123")
            .match_header("accept", GITHUB_ACCEPT)
            .match_body(Matcher::PartialJson(json!({
                "body": "## Code Review for a.py",
                "commit_id": "abc123",
                "path": "a.py",
                "line": 1,
            })))
            .with_status(201)
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;

        client(&server.url())
            .create_review_comment(7, "## Code Review for a.py", "abc123", "a.py", 1)
            .await
            .expect("comment accepted");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn summary_review_uses_the_comment_event() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repos/octo/demo/pulls/7/reviews")
            .match_body(Matcher::PartialJson(json!({
                "event": "COMMENT",
                "body": "all good",
            })))
            .with_status(200)
            .with_body(r#"{"id": 2}"#)
            .create_async()
            .await;

        client(&server.url())
            .create_review(7, "all good")
            .await
            .expect("review accepted");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_rejection_is_a_typed_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/repos/octo/demo/pulls/7/reviews")
            .with_status(422)
            .with_body("Validation Failed")
            .create_async()
            .await;

        let err = client(&server.url())
            .create_review(7, "body")
            .await
            .expect_err("422 should fail");
        match err {
            PublishError::Api(message) => {
                assert!(message.contains("422"));
                assert!(message.contains("Validation Failed"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_returns_nonblank_bodies() {
        let mut server = mockito::Server::new_async().await;
        let _comments = server
            .mock("GET", "/repos/octo/demo/pulls/7/comments")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"body":"one"},{"body":"two"},{"id":3}]"#)
            .create_async()
            .await;
        let _reviews = server
            .mock("GET", "/repos/octo/demo/pulls/7/reviews")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"body":""},{"body":"summary"}]"#)
            .create_async()
            .await;

        let gh = client(&server.url());
        assert_eq!(
            gh.list_review_comments(7).await.expect("comments"),
            vec!["one".to_string(), "two".to_string()]
        );
        assert_eq!(
            gh.list_reviews(7).await.expect("reviews"),
            vec!["summary".to_string()]
        );
    }

    #[tokio::test]
    async fn listing_follows_pagination_past_the_first_page() {
        let mut server = mockito::Server::new_async().await;
        let full_page: Vec<serde_json::Value> = (0..100)
            .map(|i| json!({"body": format!("comment {i}")}))
            .collect();
        let _page_one = server
            .mock("GET", "/repos/octo/demo/pulls/7/comments")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(json!(full_page).to_string())
            .create_async()
            .await;
        let _page_two = server
            .mock("GET", "/repos/octo/demo/pulls/7/comments")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(r#"[{"body":"tail"}]"#)
            .create_async()
            .await;

        let bodies = client(&server.url())
            .list_review_comments(7)
            .await
            .expect("comments");
        assert_eq!(bodies.len(), 101);
        assert_eq!(bodies.first().map(String::as_str), Some("comment 0"));
        assert_eq!(bodies.last().map(String::as_str), Some("tail"));
    }
}
