use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

const USER_AGENT: &str = concat!("actuator/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("request to GitHub failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("GitHub answered {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("couldn't decode GitHub response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("couldn't build GitHub API URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub html_url: Url,
    pub body: String,
}

#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Comments on an issue. Pull requests are issues as far as comments are concerned.
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<Comment, GitHubError>;
}

/// [`GitHubClient`] talking to the GitHub REST API with a personal access token.
pub struct RestClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

#[derive(Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

impl RestClient {
    pub fn new(api_url: Url, token: String) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            api_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GitHubError> {
        // `Url::join` would drop the last segment of a base like `https://host/api/v3`
        let base = self.api_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

#[async_trait]
impl GitHubClient for RestClient {
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<Comment, GitHubError> {
        let url = self.endpoint(&format!(
            "repos/{}/{}/issues/{}/comments",
            owner, repo, issue_number
        ))?;
        trace!("posting comment to {}", url);

        let response = self
            .http
            .post(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .json(&NewComment { body })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Api { status, body });
        }

        response.json().await.map_err(GitHubError::Decode)
    }
}
