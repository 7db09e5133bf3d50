use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::auth::GhToken;
use crate::batch::IssueSink;
use crate::config::{ImportConfig, RepoSlug};

const USER_AGENT: &str = concat!("issue-batch/", env!("CARGO_PKG_VERSION"));
const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Errors returned by the REST client.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} body: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("invalid API endpoint")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("failed to deserialize response")]
    Deserialize(#[from] serde_json::Error),
    #[error("response did not include an issue number")]
    MissingNumber,
}

pub type GithubResult<T> = Result<T, GithubError>;

/// Request body for issue creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub labels: &'a [String],
}

/// The parts of the created issue the importer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: Option<String>,
}

/// Minimal client for the issues collection of a single repository.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    issues_url: Url,
    auth_header: String,
}

impl GithubClient {
    /// Build a client for the repository and endpoint named in `config`.
    pub fn new(token: &GhToken, config: &ImportConfig) -> GithubResult<Self> {
        Self::with_endpoint(
            token,
            &config.api_base,
            &config.repo,
            config.request_timeout,
        )
    }

    /// Build a client against a custom API base (useful for testing).
    pub fn with_endpoint(
        token: &GhToken,
        api_base: &str,
        repo: &RepoSlug,
        timeout: Duration,
    ) -> GithubResult<Self> {
        let issues_url = issues_url(&Url::parse(api_base)?, repo)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            issues_url,
            auth_header: token.authorization_header(),
        })
    }

    #[cfg(test)]
    pub(crate) fn issues_url(&self) -> &Url {
        &self.issues_url
    }

    /// Create one issue. There is no idempotency key; every call creates a new issue.
    pub async fn create_issue(&self, issue: &NewIssue<'_>) -> GithubResult<CreatedIssue> {
        debug!(url = %self.issues_url, title = issue.title, "creating issue");

        let response = self
            .http
            .post(self.issues_url.clone())
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(issue)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GithubError::HttpStatus { status, body: text });
        }

        let text = response.text().await?;
        let payload: IssuePayload = serde_json::from_str(&text)?;
        let number = payload.number.ok_or(GithubError::MissingNumber)?;
        debug!(number, html_url = ?payload.html_url, "issue created");

        Ok(CreatedIssue {
            number,
            html_url: payload.html_url,
        })
    }
}

impl IssueSink for GithubClient {
    type Error = GithubError;

    async fn submit(&self, issue: &NewIssue<'_>) -> Result<u64, Self::Error> {
        self.create_issue(issue).await.map(|created| created.number)
    }
}

fn issues_url(base: &Url, repo: &RepoSlug) -> GithubResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["repos", repo.owner(), repo.name(), "issues"]);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: Option<u64>,
    html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn token() -> GhToken {
        GhToken::parse("gho_test").unwrap()
    }

    fn repo() -> RepoSlug {
        "octo/widgets".parse().unwrap()
    }

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::with_endpoint(&token(), &server.base_url(), &repo(), Duration::from_secs(10))
            .unwrap()
    }

    fn labels() -> Vec<String> {
        vec!["task".to_owned()]
    }

    #[test]
    fn builds_issue_collection_url() {
        let client = GithubClient::with_endpoint(
            &token(),
            "https://api.github.com",
            &repo(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            client.issues_url().as_str(),
            "https://api.github.com/repos/octo/widgets/issues"
        );
    }

    #[test]
    fn keeps_enterprise_api_prefix() {
        let client = GithubClient::with_endpoint(
            &token(),
            "https://ghe.example.com/api/v3/",
            &repo(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            client.issues_url().as_str(),
            "https://ghe.example.com/api/v3/repos/octo/widgets/issues"
        );
    }

    #[tokio::test]
    async fn create_issue_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/octo/widgets/issues")
                .header("authorization", "Bearer gho_test")
                .header("accept", "application/vnd.github+json")
                .header("x-github-api-version", "2022-11-28")
                .json_body(json!({
                    "title": "T045: Add retention config and default",
                    "body": "**Phase:** Phase 7",
                    "labels": ["task"]
                }));
            then.status(201).json_body_obj(&json!({
                "number": 101,
                "html_url": "https://github.com/octo/widgets/issues/101",
                "title": "T045: Add retention config and default"
            }));
        });

        let labels = labels();
        let created = client_for(&server)
            .create_issue(&NewIssue {
                title: "T045: Add retention config and default",
                body: "**Phase:** Phase 7",
                labels: &labels,
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(created.number, 101);
        assert_eq!(
            created.html_url.as_deref(),
            Some("https://github.com/octo/widgets/issues/101")
        );
    }

    #[tokio::test]
    async fn rejected_request_reports_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/octo/widgets/issues");
            then.status(422)
                .json_body_obj(&json!({ "message": "Validation Failed" }));
        });

        let labels = labels();
        let err = client_for(&server)
            .create_issue(&NewIssue {
                title: "T046",
                body: "",
                labels: &labels,
            })
            .await
            .unwrap_err();

        match err {
            GithubError::HttpStatus { status, body } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert!(body.contains("Validation Failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_without_number_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/octo/widgets/issues");
            then.status(201).json_body_obj(&json!({ "title": "T047" }));
        });

        let labels = labels();
        let err = client_for(&server)
            .create_issue(&NewIssue {
                title: "T047",
                body: "",
                labels: &labels,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::MissingNumber));
    }

    #[tokio::test]
    async fn non_json_response_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/octo/widgets/issues");
            then.status(201).body("<html>gateway</html>");
        });

        let labels = labels();
        let err = client_for(&server)
            .create_issue(&NewIssue {
                title: "T048",
                body: "",
                labels: &labels,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::Deserialize(_)));
    }

    #[tokio::test]
    async fn sink_yields_issue_number() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/octo/widgets/issues");
            then.status(201).json_body_obj(&json!({ "number": 7 }));
        });

        let labels = labels();
        let number = client_for(&server)
            .submit(&NewIssue {
                title: "T049",
                body: "",
                labels: &labels,
            })
            .await
            .unwrap();
        assert_eq!(number, 7);
    }
}
