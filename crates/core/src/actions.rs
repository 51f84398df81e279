//! Action domain types, constants, and validation.
//!
//! An action is a subscriber to a named event: either a plain webhook
//! (HTTP POST of the event envelope) or a code-runner invocation
//! (multipart upload of a script to a sandboxed execution service).
//! The engine selects protocol-specific behavior by matching
//! [`ActionType`] exhaustively; an unrecognized wire tag fails fast at
//! dispatch time instead of being guessed at.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an action name.
pub const MAX_ACTION_NAME_LENGTH: usize = 190;

/// Maximum length of an event name.
pub const MAX_EVENT_NAME_LENGTH: usize = 190;

/// Default entrypoint part name for code-runner uploads.
///
/// A single script is uploaded per invocation, so the entrypoint names
/// that one part unless the action was created with an explicit value.
pub const DEFAULT_ENTRYPOINT: &str = "file1";

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// The delivery mechanism for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Script executed by an external code-runner service.
    Code,
    /// Plain HTTP POST to an external URL.
    Webhook,
}

impl ActionType {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Webhook => "webhook",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "code" => Ok(Self::Code),
            "webhook" => Ok(Self::Webhook),
            _ => Err(CoreError::Validation(format!(
                "Invalid action type: '{s}'. Must be one of: code, webhook"
            ))),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an action name.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_ACTION_NAME_LENGTH` characters.
pub fn validate_action_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Action name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_ACTION_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Action name must not exceed {MAX_ACTION_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an event name.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_EVENT_NAME_LENGTH` characters.
/// - Must not contain whitespace. Names are case-sensitive and matched
///   exactly on lookup, so stray spaces would make an event unreachable.
pub fn validate_event_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Event name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_EVENT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Event name must not exceed {MAX_EVENT_NAME_LENGTH} characters"
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Event name must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Validate the type-dependent fields of an action definition.
///
/// Rules:
/// - Every action needs a non-empty `url`.
/// - `code` actions additionally need a script, a script language, and a
///   runner secret; a code action missing any of these cannot produce a
///   well-formed runner invocation.
pub fn validate_type_fields(
    action_type: ActionType,
    url: &str,
    script: &str,
    script_language: &str,
    runner_secret: &str,
) -> Result<(), CoreError> {
    if url.trim().is_empty() {
        return Err(CoreError::Validation(
            "Action url must not be empty".to_string(),
        ));
    }

    if action_type == ActionType::Code {
        if script.is_empty() {
            return Err(CoreError::Validation(
                "Code actions require a script".to_string(),
            ));
        }
        if script_language.trim().is_empty() {
            return Err(CoreError::Validation(
                "Code actions require a script language".to_string(),
            ));
        }
        if runner_secret.is_empty() {
            return Err(CoreError::Validation(
                "Code actions require a runner secret".to_string(),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- ActionType -----------------------------------------------------------

    #[test]
    fn action_type_round_trips_wire_strings() {
        assert_eq!(ActionType::from_str("code").unwrap(), ActionType::Code);
        assert_eq!(
            ActionType::from_str("webhook").unwrap(),
            ActionType::Webhook
        );
        assert_eq!(ActionType::Code.as_str(), "code");
        assert_eq!(ActionType::Webhook.as_str(), "webhook");
    }

    #[test]
    fn unknown_action_type_rejected() {
        assert!(ActionType::from_str("grpc").is_err());
        assert!(ActionType::from_str("").is_err());
        // Matching is case-sensitive, like the rest of the wire format.
        assert!(ActionType::from_str("Webhook").is_err());
    }

    // -- validate_action_name ---------------------------------------------------

    #[test]
    fn valid_action_name() {
        assert!(validate_action_name("notify-slack").is_ok());
    }

    #[test]
    fn empty_action_name_rejected() {
        assert!(validate_action_name("").is_err());
    }

    #[test]
    fn action_name_too_long_rejected() {
        let name = "a".repeat(MAX_ACTION_NAME_LENGTH + 1);
        assert!(validate_action_name(&name).is_err());
    }

    // -- validate_event_name ----------------------------------------------------

    #[test]
    fn valid_event_name() {
        assert!(validate_event_name("user.created").is_ok());
    }

    #[test]
    fn event_name_with_spaces_rejected() {
        assert!(validate_event_name("user created").is_err());
    }

    #[test]
    fn empty_event_name_rejected() {
        assert!(validate_event_name("").is_err());
    }

    // -- validate_type_fields -----------------------------------------------------

    #[test]
    fn webhook_needs_only_url() {
        assert!(validate_type_fields(ActionType::Webhook, "http://h/hook", "", "", "").is_ok());
    }

    #[test]
    fn webhook_without_url_rejected() {
        assert!(validate_type_fields(ActionType::Webhook, "  ", "", "", "").is_err());
    }

    #[test]
    fn code_action_requires_all_runner_fields() {
        assert!(
            validate_type_fields(ActionType::Code, "http://r", "print(1)", "python", "s3cret")
                .is_ok()
        );
        assert!(validate_type_fields(ActionType::Code, "http://r", "", "python", "s").is_err());
        assert!(validate_type_fields(ActionType::Code, "http://r", "x", "", "s").is_err());
        assert!(validate_type_fields(ActionType::Code, "http://r", "x", "python", "").is_err());
    }
}
