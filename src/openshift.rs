use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::OpenshiftConfig,
    shell::{CommandError, CommandExecutor},
};

mod route;
pub use route::RouteDescriptor;

/// Values bound to the template's parameters, e.g. `BRANCH_NAME`.
pub type TemplateParameters = BTreeMap<String, String>;

/// Labels stamped on every object a template creates.
pub type ObjectLabels = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum OpenshiftError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("couldn't parse route `{route}`: {source}")]
    Parse {
        route: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Operations the actuator needs from the cluster.
#[async_trait]
pub trait Openshift: Send + Sync {
    /// Instantiates `template`, returning the raw output of the command.
    async fn apply_template(
        &self,
        template: &str,
        parameters: &TemplateParameters,
        labels: &ObjectLabels,
    ) -> Result<String, OpenshiftError>;

    /// Deletes every object labelled `key=value`. Matching nothing is not an error.
    async fn delete_by_selector(&self, key: &str, value: &str) -> Result<String, OpenshiftError>;

    /// Public URL of the route named `route`.
    async fn url_for_route(&self, route: &str) -> Result<String, OpenshiftError>;
}

/// [`Openshift`] implementation driving the `oc` command line tool.
pub struct CommandLineClient<E> {
    executor: E,
    config: OpenshiftConfig,
}

impl<E: CommandExecutor> CommandLineClient<E> {
    pub fn new(executor: E, config: OpenshiftConfig) -> Self {
        Self { executor, config }
    }

    async fn oc(&self, mut args: Vec<String>) -> Result<String, CommandError> {
        if let Some(namespace) = &self.config.namespace {
            args.push(format!("--namespace={}", namespace));
        }

        let program = self.config.binary.to_string_lossy();
        debug!("running {} {}", program, args.join(" "));
        self.executor.run(&program, &args, None).await
    }
}

#[async_trait]
impl<E: CommandExecutor> Openshift for CommandLineClient<E> {
    async fn apply_template(
        &self,
        template: &str,
        parameters: &TemplateParameters,
        labels: &ObjectLabels,
    ) -> Result<String, OpenshiftError> {
        let mut args = vec!["new-app".to_owned(), format!("--template={}", template)];
        args.extend(
            parameters
                .iter()
                .map(|(name, value)| format!("--param={}={}", name, value)),
        );
        if !labels.is_empty() {
            args.push(format!("--labels={}", join_pairs(labels)));
        }

        Ok(self.oc(args).await?)
    }

    async fn delete_by_selector(&self, key: &str, value: &str) -> Result<String, OpenshiftError> {
        let args = vec![
            "delete".to_owned(),
            self.config.delete_kinds.join(","),
            format!("--selector={}={}", key, value),
        ];

        Ok(self.oc(args).await?)
    }

    async fn url_for_route(&self, route: &str) -> Result<String, OpenshiftError> {
        let args = vec![
            "export".to_owned(),
            "route".to_owned(),
            route.to_owned(),
            "-o".to_owned(),
            "yaml".to_owned(),
        ];
        let output = self.oc(args).await?;

        let descriptor =
            RouteDescriptor::from_yaml(&output).map_err(|source| OpenshiftError::Parse {
                route: route.to_owned(),
                source,
            })?;
        debug!(
            "route {} exposes {} on port {:?}",
            route, descriptor.host, descriptor.target_port
        );

        Ok(descriptor.url())
    }
}

fn join_pairs(pairs: &BTreeMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}
