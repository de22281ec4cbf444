use serde::Deserialize;

mod ping;
mod pull_request;

pub use ping::*;
pub use pull_request::*;

/// A decoded webhook delivery, discriminated by its `X-GitHub-Event` header.
#[derive(Debug)]
pub enum GitHubEvent {
    Ping(PingEvent),
    PullRequest(PullRequestEvent),
    /// Any event kind we don't decode, with its name
    Other(String),
}

impl GitHubEvent {
    pub fn kind(&self) -> &str {
        match self {
            GitHubEvent::Ping(_) => "ping",
            GitHubEvent::PullRequest(_) => "pull_request",
            GitHubEvent::Other(kind) => kind.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: GitHubUser,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub head: PrRef,
}

#[derive(Debug, Deserialize)]
pub struct PrRef {
    pub r#ref: String,
}
