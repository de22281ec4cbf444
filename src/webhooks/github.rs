use anyhow::anyhow;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    serde::json::Json,
    Request, State,
};
use tracing::{debug, info, trace, warn};

mod events;
pub use events::*;

mod signing;
use signing::SignedGitHubPayload;

use crate::{
    actuator::{EventHandler, EventResponse},
    webhooks::Handler,
};

const X_GITHUB_EVENT: &str = "X-GitHub-Event";

pub struct GitHubSecret(pub Option<String>);

#[rocket::post("/api/webhooks/github", data = "<payload>")]
pub async fn github_webhook(
    event_type: GitHubEventType,
    payload: SignedGitHubPayload,
    handler: &State<Handler>,
) -> (Status, Json<EventResponse>) {
    trace!("payload: {}", payload.0);

    let event = match event_type.decode(&payload.0) {
        Ok(event) => event,
        Err(e) => {
            warn!("couldn't decode {:?} payload: {}", event_type, e);
            let response =
                EventResponse::ignore("Payload could not be decoded and will be ignored.");
            return (Status::Ok, Json(response));
        }
    };
    info!("received {} event", event.kind());

    if let GitHubEvent::Ping(ping) = &event {
        info!("webhook {} says: {}", ping.hook_id, ping.zen);
    }

    let response = handler.0.get_event_response(&event);
    debug!("{}", response.message);
    if !response.handle_event {
        return (Status::Ok, Json(response));
    }

    if let Err(e) = handler.0.handle_event(&event).await {
        warn!("encountered error while handling event: {:#}", e);
        let response = EventResponse::handle(format!("{:#}", e));
        return (Status::InternalServerError, Json(response));
    }

    (Status::Ok, Json(response))
}

#[derive(Debug)]
pub enum GitHubEventType {
    Ping,
    PullRequest,
    Other(String),
}

impl GitHubEventType {
    fn decode(&self, payload: &str) -> serde_json::Result<GitHubEvent> {
        Ok(match self {
            Self::Ping => GitHubEvent::Ping(serde_json::from_str(payload)?),
            Self::PullRequest => GitHubEvent::PullRequest(serde_json::from_str(payload)?),
            Self::Other(kind) => GitHubEvent::Other(kind.clone()),
        })
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let event_types = request.headers().get(X_GITHUB_EVENT).collect::<Vec<_>>();
        if event_types.len() != 1 {
            return Outcome::Error((
                Status::BadRequest,
                anyhow!("request header needs exactly one event type"),
            ));
        }

        let event_type = match event_types[0] {
            "ping" => Self::Ping,
            "pull_request" => Self::PullRequest,
            other => Self::Other(other.to_owned()),
        };

        Outcome::Success(event_type)
    }
}
