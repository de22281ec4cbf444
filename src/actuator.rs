use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::webhooks::GitHubEvent;

mod pull_request;
pub use pull_request::PullRequestEventHandler;

/// What the actuator intends to do with an event, sent back to GitHub as the webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    pub handle_event: bool,
    pub message: String,
}

impl EventResponse {
    pub fn handle(message: impl Into<String>) -> Self {
        Self {
            handle_event: true,
            message: message.into(),
        }
    }

    pub fn ignore(message: impl Into<String>) -> Self {
        Self {
            handle_event: false,
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Decides whether `event` should be handled, without side effects.
    fn get_event_response(&self, event: &GitHubEvent) -> EventResponse;

    /// Acts on `event`. Events [`EventHandler::get_event_response`] would ignore are left alone.
    async fn handle_event(&self, event: &GitHubEvent) -> anyhow::Result<()>;
}
