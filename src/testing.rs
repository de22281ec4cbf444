//! Test doubles for the clients the actuator talks to.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::{
    github::{Comment, GitHubClient, GitHubError},
    openshift::{ObjectLabels, Openshift, OpenshiftError, TemplateParameters},
    shell::{CommandError, CommandExecutor},
    webhooks::GitHubEvent,
};

/// Builds a pull request event whose head branch is `pr-<number>`.
pub fn test_event(number: u64, action: &str, full_name: &str) -> GitHubEvent {
    let (owner, name) = full_name
        .split_once('/')
        .expect("full name should be owner/name");
    let payload = serde_json::json!({
        "action": action,
        "number": number,
        "pull_request": {
            "number": number,
            "head": { "ref": format!("pr-{}", number) },
        },
        "repository": {
            "name": name,
            "full_name": full_name,
            "owner": { "login": owner },
        },
    });

    GitHubEvent::PullRequest(serde_json::from_value(payload).expect("valid test event"))
}

/// Returns canned output and records every invocation.
#[derive(Clone)]
pub struct MockShell {
    result: Result<String, String>,
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockShell {
    pub fn returning(output: &str) -> Self {
        Self {
            result: Ok(output.to_owned()),
            calls: Default::default(),
        }
    }

    pub fn failing(output: &str) -> Self {
        Self {
            result: Err(output.to_owned()),
            calls: Default::default(),
        }
    }

    pub fn last_call(&self) -> Option<(String, Vec<String>)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CommandExecutor for MockShell {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        _stdin: Option<&str>,
    ) -> Result<String, CommandError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_owned(), args.to_vec()));

        self.result.clone().map_err(|output| CommandError::Failed {
            program: program.to_owned(),
            code: Some(1),
            output,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct OpenshiftCalls {
    pub applied_template: Option<String>,
    pub applied_parameters: TemplateParameters,
    pub applied_labels: ObjectLabels,
    pub deleted_selector: Option<(String, String)>,
    pub route_lookups: Vec<String>,
}

/// Records what the handler asks of the cluster. Route lookups fail unless a host is set.
#[derive(Default)]
pub struct OpenshiftMock {
    route_host: Option<String>,
    fail: bool,
    calls: Mutex<OpenshiftCalls>,
}

impl OpenshiftMock {
    pub fn with_route(host: &str) -> Self {
        Self {
            route_host: Some(host.to_owned()),
            ..Default::default()
        }
    }

    /// Every command fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> OpenshiftCalls {
        self.calls.lock().unwrap().clone()
    }

    fn command_error(&self) -> Result<String, OpenshiftError> {
        Err(OpenshiftError::Command(CommandError::Failed {
            program: "oc".to_owned(),
            code: Some(1),
            output: "error: You must be logged in to the server (Unauthorized)".to_owned(),
        }))
    }
}

#[async_trait]
impl Openshift for OpenshiftMock {
    async fn apply_template(
        &self,
        template: &str,
        parameters: &TemplateParameters,
        labels: &ObjectLabels,
    ) -> Result<String, OpenshiftError> {
        if self.fail {
            return self.command_error();
        }

        let mut calls = self.calls.lock().unwrap();
        calls.applied_template = Some(template.to_owned());
        calls.applied_parameters = parameters.clone();
        calls.applied_labels = labels.clone();

        Ok(format!("--> Deploying template \"{}\"", template))
    }

    async fn delete_by_selector(&self, key: &str, value: &str) -> Result<String, OpenshiftError> {
        if self.fail {
            return self.command_error();
        }

        self.calls.lock().unwrap().deleted_selector = Some((key.to_owned(), value.to_owned()));

        Ok("No resources found\n".to_owned())
    }

    async fn url_for_route(&self, route: &str) -> Result<String, OpenshiftError> {
        self.calls.lock().unwrap().route_lookups.push(route.to_owned());

        match &self.route_host {
            Some(host) => Ok(format!("http://{}", host)),
            None => Err(OpenshiftError::Command(CommandError::Failed {
                program: "oc".to_owned(),
                code: Some(1),
                output: format!(
                    "Error from server (NotFound): routes \"{}\" not found",
                    route
                ),
            })),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostedComment {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub body: String,
}

#[derive(Default)]
pub struct GitHubMock {
    fail: bool,
    comments: Mutex<Vec<PostedComment>>,
}

impl GitHubMock {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn last_comment(&self) -> Option<PostedComment> {
        self.comments.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GitHubClient for GitHubMock {
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<Comment, GitHubError> {
        if self.fail {
            return Err(GitHubError::Api {
                status: StatusCode::UNAUTHORIZED,
                body: r#"{"message":"Bad credentials"}"#.to_owned(),
            });
        }

        self.comments.lock().unwrap().push(PostedComment {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            issue_number,
            body: body.to_owned(),
        });

        let html_url = format!(
            "https://github.com/{}/{}/issues/{}#issuecomment-330230087",
            owner, repo, issue_number
        );
        Ok(Comment {
            id: 330230087,
            html_url: Url::parse(&html_url).expect("valid comment URL"),
            body: body.to_owned(),
        })
    }
}
