use std::{collections::HashMap, net::IpAddr, path::PathBuf};

use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct ActuatorConfig {
    /// Token used to comment on pull requests
    pub github_token: String,
    /// Base URL of the GitHub REST API, override for GitHub Enterprise
    #[serde(default = "default_github_api_url")]
    pub github_api_url: Url,
    /// Secret shared with GitHub to sign webhook payloads. Payloads are accepted unsigned when
    /// this is left out.
    pub github_secret: Option<String>,
    #[serde(default = "default_address")]
    pub address: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds in-flight requests get to finish once shutdown is requested
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace: u32,
    #[serde(default)]
    pub openshift: OpenshiftConfig,
    #[serde(default)]
    pub repositories: Repositories,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenshiftConfig {
    /// Path to the `oc` binary
    #[serde(default = "default_oc_binary")]
    pub binary: PathBuf,
    /// Project to operate in, the current `oc` context's project if unset
    pub namespace: Option<String>,
    /// Name of the route the templates create for the review environment
    #[serde(default = "default_route_name")]
    pub route_name: String,
    /// Kinds of objects removed when a pull request is closed
    #[serde(default = "default_delete_kinds")]
    pub delete_kinds: Vec<String>,
}

impl Default for OpenshiftConfig {
    fn default() -> Self {
        Self {
            binary: default_oc_binary(),
            namespace: None,
            route_name: default_route_name(),
            delete_kinds: default_delete_kinds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub enabled: bool,
    /// OpenShift template instantiated for every pull request
    pub template: String,
}

/// Per-repository settings, keyed by full name (`owner/name`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Repositories(HashMap<String, RepositoryConfig>);

impl Repositories {
    pub fn find(&self, full_name: &str) -> Option<&RepositoryConfig> {
        self.0.get(full_name)
    }
}

impl FromIterator<(String, RepositoryConfig)> for Repositories {
    fn from_iter<T: IntoIterator<Item = (String, RepositoryConfig)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn default_github_api_url() -> Url {
    Url::parse("https://api.github.com").expect("hardcoded URL is valid")
}

fn default_address() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_grace() -> u32 {
    5
}

fn default_oc_binary() -> PathBuf {
    PathBuf::from("oc")
}

fn default_route_name() -> String {
    "actuator".to_owned()
}

// `all` leaves out config maps, secrets and volume claims
fn default_delete_kinds() -> Vec<String> {
    ["all", "configmap", "secret", "persistentvolumeclaim"]
        .iter()
        .map(|kind| kind.to_string())
        .collect()
}
