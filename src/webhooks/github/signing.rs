use std::io;

use anyhow::anyhow;
use rocket::{
    data::{ByteUnit, FromData, Outcome},
    http::Status,
    Data, Request,
};
use tracing::trace;

use crate::webhooks::github::GitHubSecret;

const X_GITHUB_SIGNATURE: &str = "X-Hub-Signature-256";

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

fn validate_signature(secret: &str, signature: &str, data: &str) -> bool {
    trace!("validating signature...");
    use hmac::{Mac, NewMac};

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };

    mac.update(data.as_bytes());

    // GitHub puts a prefix in front of its hex SHA256
    let signature = match signature.strip_prefix("sha256=") {
        Some(s) => s,
        None => {
            trace!("couldn't strip prefix from signature `{}`", signature);
            return false;
        }
    };

    match hex::decode(signature) {
        Ok(bytes) => mac.verify(&bytes).is_ok(),
        Err(_) => {
            trace!("couldn't decode hex-encoded signature {}", signature);
            false
        }
    }
}

/// Webhook body, checked against its signature when a secret is configured.
pub struct SignedGitHubPayload(pub String);

const LIMIT: ByteUnit = ByteUnit::Mebibyte(1);

// Tracking issue for chaining Data guards to avoid reimplementing all this:
// https://github.com/SergioBenitez/Rocket/issues/775
#[rocket::async_trait]
impl<'r> FromData<'r> for SignedGitHubPayload {
    type Error = anyhow::Error;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        trace!("received payload on GitHub webhook endpoint: {:?}", request);

        if !request.content_type().map_or(false, |ct| ct.is_json()) {
            trace!(
                "content type `{:?}` wasn't json, stopping here...",
                request.content_type()
            );
            return Outcome::Error((Status::BadRequest, anyhow!("wrong content type")));
        }

        let secret = request
            .rocket()
            .state::<GitHubSecret>()
            .and_then(|secret| secret.0.as_deref());

        let signature = match secret {
            Some(_) => {
                let signatures = request
                    .headers()
                    .get(X_GITHUB_SIGNATURE)
                    .collect::<Vec<_>>();
                if signatures.len() != 1 {
                    trace!("couldn't locate {} header", X_GITHUB_SIGNATURE);
                    return Outcome::Error((
                        Status::BadRequest,
                        anyhow!("request header needs exactly one signature"),
                    ));
                }
                Some(signatures[0])
            }
            None => None,
        };

        let size_limit = request.limits().get("json").unwrap_or(LIMIT);
        let content = match data.open(size_limit).into_string().await {
            Ok(s) if s.is_complete() => s.into_inner(),
            Ok(_) => {
                let eof = io::ErrorKind::UnexpectedEof;
                trace!("payload was too big");
                return Outcome::Error((
                    Status::PayloadTooLarge,
                    io::Error::new(eof, "data limit exceeded").into(),
                ));
            }
            Err(e) => return Outcome::Error((Status::BadRequest, e.into())),
        };

        if let (Some(secret), Some(signature)) = (secret, signature) {
            if !validate_signature(secret, signature, &content) {
                trace!("signature validation failed, stopping here...");
                return Outcome::Error((
                    Status::BadRequest,
                    anyhow!("couldn't verify signature"),
                ));
            }
            trace!("validated GitHub payload");
        }

        Outcome::Success(SignedGitHubPayload(content))
    }
}

/// Computes the `X-Hub-Signature-256` header GitHub would send for `data`.
#[cfg(test)]
pub(crate) fn sign(secret: &str, data: &str) -> String {
    use hmac::{Mac, NewMac};

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(data.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
