use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use tracing::{debug, info, trace, warn};

use crate::{
    actuator::{EventHandler, EventResponse},
    config::{Repositories, RepositoryConfig},
    github::GitHubClient,
    openshift::{ObjectLabels, Openshift, TemplateParameters},
    webhooks::{
        github::{PullRequestAction, PullRequestEvent},
        GitHubEvent,
    },
};

const LABEL_PREFIX: &str = "actuator.nine.ch/";
const CREATE_REASON: &str = "GithubWebhook";
const BRANCH_NAME_PARAMETER: &str = "BRANCH_NAME";

const ENVIRONMENT_MESSAGE: &str = "Your environment is being set-up on Openshift.";
const NO_ROUTE_MESSAGE: &str = "There is no route I can point you to.";

/// Creates a review environment when a pull request is opened and removes it once the pull
/// request is closed.
pub struct PullRequestEventHandler {
    repositories: Repositories,
    route_name: String,
    openshift: Arc<dyn Openshift>,
    github: Arc<dyn GitHubClient>,
}

impl PullRequestEventHandler {
    pub fn new(
        repositories: Repositories,
        route_name: String,
        openshift: Arc<dyn Openshift>,
        github: Arc<dyn GitHubClient>,
    ) -> Self {
        Self {
            repositories,
            route_name,
            openshift,
            github,
        }
    }

    /// Returns the pull request event and its repository's settings if the event must be acted
    /// upon, or the response explaining why it's ignored.
    fn triage<'a>(
        &'a self,
        event: &'a GitHubEvent,
    ) -> Result<(&'a PullRequestEvent, &'a RepositoryConfig), EventResponse> {
        let event = match event {
            GitHubEvent::PullRequest(event) => event,
            _ => return Err(EventResponse::ignore("Invalid event for this handler.")),
        };

        if !matches!(
            event.action,
            PullRequestAction::Opened | PullRequestAction::Reopened | PullRequestAction::Closed
        ) {
            return Err(EventResponse::ignore(
                "Event is not relevant and will be ignored.",
            ));
        }

        let full_name = &event.repository.full_name;
        match self.repositories.find(full_name) {
            Some(repository) if repository.enabled => Ok((event, repository)),
            _ => Err(EventResponse::ignore(format!(
                "Repository {} is not configured or disabled. Doing nothing.",
                full_name
            ))),
        }
    }

    async fn create_environment(
        &self,
        event: &PullRequestEvent,
        repository: &RepositoryConfig,
    ) -> anyhow::Result<()> {
        let labels = labels_for(event);
        let parameters = parameters_for(event);

        let output = self
            .openshift
            .apply_template(&repository.template, &parameters, &labels)
            .await
            .with_context(|| format!("couldn't apply template {}", repository.template))?;
        debug!("applied template {}:\n{}", repository.template, output);

        let body = match self.openshift.url_for_route(&self.route_name).await {
            Ok(url) => format!("{} {}", ENVIRONMENT_MESSAGE, url),
            Err(e) => {
                warn!("couldn't get URL for route {}: {}", self.route_name, e);
                format!("{} {}", ENVIRONMENT_MESSAGE, NO_ROUTE_MESSAGE)
            }
        };

        let comment = self
            .github
            .create_comment(
                &event.repository.owner.login,
                &event.repository.name,
                event.number,
                &body,
            )
            .await
            .context("couldn't comment on pull request")?;
        info!("created comment {} on GitHub: {}", comment.id, comment.html_url);
        trace!("comment body: {}", comment.body);

        Ok(())
    }

    async fn delete_environment(&self, event: &PullRequestEvent) -> anyhow::Result<()> {
        let key = label("pull-request");
        let value = event.number.to_string();

        let output = self
            .openshift
            .delete_by_selector(&key, &value)
            .await
            .with_context(|| format!("couldn't delete objects labelled {}={}", key, value))?;
        debug!("deleted objects labelled {}={}:\n{}", key, value, output);

        Ok(())
    }
}

#[async_trait]
impl EventHandler for PullRequestEventHandler {
    fn get_event_response(&self, event: &GitHubEvent) -> EventResponse {
        match self.triage(event) {
            Ok((event, _)) => EventResponse::handle(format!(
                "Event for pull request #{} received. Thank you.",
                event.number
            )),
            Err(response) => response,
        }
    }

    async fn handle_event(&self, event: &GitHubEvent) -> anyhow::Result<()> {
        let (event, repository) = match self.triage(event) {
            Ok(accepted) => accepted,
            Err(response) => {
                trace!("not handling event: {}", response.message);
                return Ok(());
            }
        };

        info!(
            "handling {} pull request #{} of {}",
            event.action, event.number, event.repository.full_name
        );

        match event.action {
            PullRequestAction::Opened | PullRequestAction::Reopened => {
                self.create_environment(event, repository).await
            }
            PullRequestAction::Closed => self.delete_environment(event).await,
            PullRequestAction::Other => {
                bail!("no handler for pull request action {}", event.action)
            }
        }
    }
}

fn label(name: &str) -> String {
    format!("{}{}", LABEL_PREFIX, name)
}

fn labels_for(event: &PullRequestEvent) -> ObjectLabels {
    ObjectLabels::from([
        (label("create-reason"), CREATE_REASON.to_owned()),
        (label("branch"), event.head_ref().to_owned()),
        (label("pull-request"), event.number.to_string()),
    ])
}

fn parameters_for(event: &PullRequestEvent) -> TemplateParameters {
    TemplateParameters::from([(BRANCH_NAME_PARAMETER.to_owned(), event.head_ref().to_owned())])
}
