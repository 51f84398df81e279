//! The per-publish event envelope.

use serde::Serialize;

use pulse_core::types::DbId;

/// The event payload handed to every subscribed action during one
/// publish.
///
/// Constructed once per publish and shared read-only across all
/// workers (wrap it in `Arc`); there is no mutation API. Serializes to
/// the webhook wire shape `{"eventName", "orgId", "payload"}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEnvelope {
    pub event_name: String,
    pub org_id: DbId,
    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,
}

impl PublishEnvelope {
    pub fn new(event_name: impl Into<String>, org_id: DbId, payload: serde_json::Value) -> Self {
        Self {
            event_name: event_name.into(),
            org_id,
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
