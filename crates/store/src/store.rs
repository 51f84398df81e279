//! Storage seam traits.
//!
//! Production deployments implement these against a real database;
//! the engine and the service façades only ever see the traits. Both
//! are object-safe so they can be shared as `Arc<dyn …>`.

use std::collections::HashMap;

use async_trait::async_trait;

use pulse_core::types::DbId;

use crate::error::StoreError;
use crate::models::{Action, CreateActionForm, Event, RegisterEventForm};

/// CRUD for registered event names.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create an event. Fails with [`StoreError::DuplicateName`] if the
    /// name is already registered in the org.
    async fn create_event(&self, form: RegisterEventForm) -> Result<Event, StoreError>;

    /// List all events registered in an org.
    async fn list_events(&self, org_id: DbId) -> Result<Vec<Event>, StoreError>;

    /// Delete an event by name. Fails with [`StoreError::NotFound`] if
    /// no such event exists in the org.
    async fn delete_event(&self, org_id: DbId, name: &str) -> Result<(), StoreError>;
}

/// CRUD and lookup for action definitions.
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Create an action from a validated form.
    async fn create_action(
        &self,
        org_id: DbId,
        form: CreateActionForm,
    ) -> Result<Action, StoreError>;

    /// Delete an action by id.
    async fn delete_action(&self, org_id: DbId, id: DbId) -> Result<(), StoreError>;

    /// Retrieve an action by name.
    async fn action_by_name(&self, org_id: DbId, name: &str) -> Result<Action, StoreError>;

    /// Resolve every action subscribed to `event_name` in the org.
    ///
    /// This is the dispatcher's step-1 lookup; an empty result is not
    /// an error.
    async fn actions_by_registered_event(
        &self,
        org_id: DbId,
        event_name: &str,
    ) -> Result<Vec<Action>, StoreError>;

    /// Produce usage-metric counts, keyed by the constants in
    /// [`pulse_core::metric_names`].
    async fn usage_metrics(&self) -> Result<HashMap<String, serde_json::Value>, StoreError>;
}
