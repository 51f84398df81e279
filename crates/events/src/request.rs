//! Outbound request construction.
//!
//! Pure builders: they assemble a [`reqwest::Request`] from the event
//! envelope and an action definition, selected by the action's type
//! tag. No network I/O happens here; the request is executed later by
//! the [`ActionExecutor`](crate::executor::ActionExecutor).
//!
//! Two wire protocols are produced from one envelope:
//!
//! - **Webhook**: `POST {action.url}` with the JSON-encoded envelope.
//! - **Code runner**: `POST {action.url}/execute` with a multipart
//!   body carrying the script, a metadata part, and the raw event
//!   payload, authorized with the action's runner secret.

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Request, Url};
use serde::Serialize;

use pulse_core::actions::ActionType;
use pulse_store::models::Action;

use crate::envelope::PublishEnvelope;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from request construction. All of them mark the single
/// affected action as failed; none abort the surrounding publish.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The envelope payload or runner metadata could not be JSON-encoded.
    #[error("Cannot serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The action's URL could not be parsed.
    #[error("Invalid action URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP request could not be assembled.
    #[error("Cannot construct request: {0}")]
    Construction(#[from] reqwest::Error),

    /// The action's type tag matches no known variant.
    #[error("Unknown action type: '{0}'")]
    UnknownActionType(String),
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Metadata part sent alongside the script in a runner invocation.
#[derive(Debug, Serialize)]
struct RunnerMetadata<'a> {
    name: &'a str,
    lang: &'a str,
    entrypoint: &'a str,
}

/// Build the outbound request for an action, selecting the protocol by
/// the action's type tag.
///
/// An unrecognized tag fails fast with
/// [`BuildError::UnknownActionType`]; no request is constructed.
pub fn build_request(
    client: &Client,
    envelope: &PublishEnvelope,
    action: &Action,
) -> Result<Request, BuildError> {
    match ActionType::from_str(&action.action_type) {
        Ok(ActionType::Webhook) => build_webhook_request(client, envelope, action),
        Ok(ActionType::Code) => build_runner_request(client, envelope, action),
        Err(_) => Err(BuildError::UnknownActionType(action.action_type.clone())),
    }
}

/// Build a webhook invocation: `POST {action.url}` with the
/// JSON-encoded envelope as the body.
pub fn build_webhook_request(
    client: &Client,
    envelope: &PublishEnvelope,
    action: &Action,
) -> Result<Request, BuildError> {
    let body = serde_json::to_vec(envelope)?;
    let url = parse_url(&action.url)?;

    let request = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .build()?;
    Ok(request)
}

/// Build a code-runner invocation: `POST {action.url}/execute` with a
/// multipart body.
///
/// Parts, in order: the script bytes under the action's entrypoint
/// name, a `metadata` part (`{name, lang, entrypoint}`), and an
/// `event` part with the raw JSON payload. The runner secret goes in
/// the `Authorization` header; the multipart encoder supplies the
/// boundary `Content-Type`.
pub fn build_runner_request(
    client: &Client,
    envelope: &PublishEnvelope,
    action: &Action,
) -> Result<Request, BuildError> {
    let metadata = serde_json::to_vec(&RunnerMetadata {
        name: &action.name,
        lang: &action.script_language,
        entrypoint: &action.entrypoint,
    })?;
    let payload = serde_json::to_vec(&envelope.payload)?;

    let form = Form::new()
        .part(
            action.entrypoint.clone(),
            Part::bytes(action.script.clone().into_bytes()).file_name(action.entrypoint.clone()),
        )
        .part("metadata", Part::bytes(metadata).mime_str("application/json")?)
        .part("event", Part::bytes(payload).mime_str("application/json")?);

    let url = runner_url(&action.url)?;

    let request = client
        .post(url)
        .bearer_auth(&action.runner_secret)
        .multipart(form)
        .build()?;
    Ok(request)
}

fn parse_url(raw: &str) -> Result<Url, BuildError> {
    Url::parse(raw).map_err(|e| BuildError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Join `execute` onto the runner base URL, tolerating a trailing
/// slash on the base.
fn runner_url(base: &str) -> Result<Url, BuildError> {
    let mut url = parse_url(base)?;
    url.path_segments_mut()
        .map_err(|_| BuildError::InvalidUrl {
            url: base.to_string(),
            reason: "cannot be a base URL".to_string(),
        })?
        .pop_if_empty()
        .push("execute");
    Ok(url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> PublishEnvelope {
        PublishEnvelope::new("user.created", 1, serde_json::json!({"id": 42}))
    }

    fn action(action_type: &str, url: &str) -> Action {
        let now = chrono::Utc::now();
        Action {
            id: 1,
            org_id: 1,
            name: "B".to_string(),
            action_type: action_type.to_string(),
            url: url.to_string(),
            script: "print(1)".to_string(),
            script_language: "python".to_string(),
            runner_secret: "s3cret".to_string(),
            entrypoint: "file1".to_string(),
            registered_events: vec!["user.created".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    // -- webhook ----------------------------------------------------------------

    #[test]
    fn webhook_request_posts_envelope_json() {
        let client = Client::new();
        let request =
            build_webhook_request(&client, &envelope(), &action("webhook", "http://h/hook"))
                .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://h/hook");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = request.body().unwrap().as_bytes().unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(
            decoded,
            serde_json::json!({
                "eventName": "user.created",
                "orgId": 1,
                "payload": {"id": 42},
            })
        );
    }

    #[test]
    fn webhook_request_rejects_malformed_url() {
        let client = Client::new();
        let err = build_webhook_request(&client, &envelope(), &action("webhook", "not a url"))
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidUrl { .. }));
    }

    // -- runner -----------------------------------------------------------------

    #[test]
    fn runner_request_targets_execute_with_bearer_auth() {
        let client = Client::new();
        let request =
            build_runner_request(&client, &envelope(), &action("code", "http://r")).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://r/execute");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer s3cret"
        );

        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn runner_url_join_tolerates_trailing_slash() {
        assert_eq!(
            runner_url("http://r/runner/").unwrap().as_str(),
            "http://r/runner/execute"
        );
        assert_eq!(
            runner_url("http://r/runner").unwrap().as_str(),
            "http://r/runner/execute"
        );
    }

    #[test]
    fn runner_request_rejects_malformed_url() {
        let client = Client::new();
        let err =
            build_runner_request(&client, &envelope(), &action("code", "::nope")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidUrl { .. }));
    }

    #[test]
    fn runner_metadata_encodes_expected_shape() {
        let metadata = RunnerMetadata {
            name: "B",
            lang: "python",
            entrypoint: "file1",
        };
        let encoded = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"name": "B", "lang": "python", "entrypoint": "file1"})
        );
    }

    // -- type selection -----------------------------------------------------------

    #[test]
    fn unknown_action_type_fails_fast() {
        let client = Client::new();
        let err = build_request(
            &client,
            &envelope(),
            &action("carrier-pigeon", "http://h/hook"),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::UnknownActionType(tag) if tag == "carrier-pigeon"));
    }

    #[test]
    fn known_types_select_their_protocol() {
        let client = Client::new();

        let webhook =
            build_request(&client, &envelope(), &action("webhook", "http://h/hook")).unwrap();
        assert_eq!(webhook.url().as_str(), "http://h/hook");

        let runner = build_request(&client, &envelope(), &action("code", "http://r")).unwrap();
        assert_eq!(runner.url().as_str(), "http://r/execute");
    }
}
