use rocket::{routes, Build, Rocket};

use crate::actuator::EventHandler;

pub mod github;
pub use github::{github_webhook, GitHubEvent, GitHubSecret};

pub struct Handler(pub Box<dyn EventHandler>);

/// Mounts the webhook endpoints on `rocket`, dispatching events to `handler`.
pub fn mount(
    rocket: Rocket<Build>,
    handler: Box<dyn EventHandler>,
    github_secret: Option<String>,
) -> Rocket<Build> {
    rocket
        .mount("/", routes![github_webhook])
        .manage(Handler(handler))
        .manage(GitHubSecret(github_secret))
}
