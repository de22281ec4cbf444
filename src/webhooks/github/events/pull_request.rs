use std::fmt::Display;

use serde::Deserialize;

use crate::webhooks::github::events::{PullRequest, Repository};

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub number: u64,
    pub repository: Repository,
    pub pull_request: PullRequest,
}

impl PullRequestEvent {
    /// Branch the pull request wants to merge.
    pub fn head_ref(&self) -> &str {
        &self.pull_request.head.r#ref
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    Opened,
    Closed,
    Reopened,
    // synchronize, edited, labeled, ...
    #[serde(other)]
    Other,
}

impl Display for PullRequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Other => "other",
        };
        f.write_str(action)
    }
}
