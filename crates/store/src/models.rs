//! Event and action models and DTOs.
//!
//! Defines the stored entity structs and the create / register forms
//! used by the service façades. The engine treats
//! [`Action::registered_events`] as opaque; resolving "actions for
//! event X" belongs to the store, not the dispatcher.

use serde::{Deserialize, Serialize};

use pulse_core::actions::{
    validate_action_name, validate_event_name, validate_type_fields, ActionType,
    DEFAULT_ENTRYPOINT,
};
use pulse_core::error::CoreError;
use pulse_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A registered event name that actions can subscribe to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: DbId,
    /// Unique per org, case-sensitive.
    pub name: String,
    pub org_id: DbId,
    pub created_at: Timestamp,
}

/// A subscriber definition: webhook or code-runner invocation.
///
/// `action_type` holds the wire tag (`"code"` / `"webhook"`); it is
/// parsed into [`ActionType`] at dispatch time so an unknown tag fails
/// fast there instead of silently selecting a protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: DbId,
    pub org_id: DbId,
    pub name: String,
    pub action_type: String,
    /// Webhook target, or code-runner base URL.
    pub url: String,
    /// Script source (code actions only).
    pub script: String,
    /// Script language understood by the runner (code actions only).
    pub script_language: String,
    /// Bearer token presented to the runner (code actions only).
    pub runner_secret: String,
    /// Which uploaded part the runner should execute.
    pub entrypoint: String,
    /// Names of the events this action is subscribed to.
    pub registered_events: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Input for registering a new event name.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterEventForm {
    pub name: String,
    pub org_id: DbId,
}

impl RegisterEventForm {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_event_name(&self.name)
    }
}

/// Input for creating a new action definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActionForm {
    pub name: String,
    pub action_type: String,
    pub url: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub script_language: String,
    #[serde(default)]
    pub runner_secret: String,
    /// Defaults to [`DEFAULT_ENTRYPOINT`] when omitted.
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub registered_events: Vec<String>,
}

impl CreateActionForm {
    /// Validate the form against the domain rules.
    ///
    /// Parses the type tag, checks the name, and enforces the
    /// type-dependent field invariant (code actions need script,
    /// language, and secret; every action needs a url).
    pub fn validate(&self) -> Result<ActionType, CoreError> {
        let action_type = ActionType::from_str(&self.action_type)?;
        validate_action_name(&self.name)?;
        validate_type_fields(
            action_type,
            &self.url,
            &self.script,
            &self.script_language,
            &self.runner_secret,
        )?;
        for event_name in &self.registered_events {
            validate_event_name(event_name)?;
        }
        Ok(action_type)
    }

    /// The entrypoint to store: explicit value or the default.
    pub fn entrypoint_or_default(&self) -> String {
        self.entrypoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENTRYPOINT)
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
