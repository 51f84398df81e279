//! In-memory store backend.
//!
//! [`MemoryStore`] keeps events and actions in `RwLock`-guarded maps.
//! Thread-safe via interior locking; designed to be wrapped in `Arc`
//! and shared across tasks. Serves as the reference implementation of
//! the store semantics and as the backend for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pulse_core::actions::ActionType;
use pulse_core::metric_names::{
    METRIC_ACTIONS_CODE_COUNT, METRIC_ACTIONS_COUNT, METRIC_ACTIONS_WEBHOOK_COUNT,
    METRIC_EVENTS_COUNT,
};
use pulse_core::types::DbId;

use crate::error::StoreError;
use crate::models::{Action, CreateActionForm, Event, RegisterEventForm};
use crate::store::{ActionStore, EventStore};

/// Thread-safe in-memory implementation of both store traits.
pub struct MemoryStore {
    /// Events keyed by `(org_id, name)`.
    events: RwLock<HashMap<(DbId, String), Event>>,
    /// Actions keyed by id.
    actions: RwLock<HashMap<DbId, Action>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            actions: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, form: RegisterEventForm) -> Result<Event, StoreError> {
        form.validate()?;

        let mut events = self.events.write().await;
        let key = (form.org_id, form.name.clone());
        if events.contains_key(&key) {
            return Err(StoreError::DuplicateName(form.name));
        }

        let event = Event {
            id: self.allocate_id(),
            name: form.name,
            org_id: form.org_id,
            created_at: Utc::now(),
        };
        events.insert(key, event.clone());
        Ok(event)
    }

    async fn list_events(&self, org_id: DbId) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        let mut listed: Vec<Event> = events
            .values()
            .filter(|e| e.org_id == org_id)
            .cloned()
            .collect();
        listed.sort_by_key(|e| e.id);
        Ok(listed)
    }

    async fn delete_event(&self, org_id: DbId, name: &str) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        events
            .remove(&(org_id, name.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: "Event",
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl ActionStore for MemoryStore {
    async fn create_action(
        &self,
        org_id: DbId,
        form: CreateActionForm,
    ) -> Result<Action, StoreError> {
        form.validate()?;

        let mut actions = self.actions.write().await;
        if actions
            .values()
            .any(|a| a.org_id == org_id && a.name == form.name)
        {
            return Err(StoreError::DuplicateName(form.name));
        }

        let now = Utc::now();
        let entrypoint = form.entrypoint_or_default();
        let action = Action {
            id: self.allocate_id(),
            org_id,
            name: form.name,
            action_type: form.action_type,
            url: form.url,
            script: form.script,
            script_language: form.script_language,
            runner_secret: form.runner_secret,
            entrypoint,
            registered_events: form.registered_events,
            created_at: now,
            updated_at: now,
        };
        actions.insert(action.id, action.clone());
        Ok(action)
    }

    async fn delete_action(&self, org_id: DbId, id: DbId) -> Result<(), StoreError> {
        let mut actions = self.actions.write().await;
        match actions.get(&id) {
            Some(action) if action.org_id == org_id => {
                actions.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "Action",
                name: id.to_string(),
            }),
        }
    }

    async fn action_by_name(&self, org_id: DbId, name: &str) -> Result<Action, StoreError> {
        let actions = self.actions.read().await;
        actions
            .values()
            .find(|a| a.org_id == org_id && a.name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Action",
                name: name.to_string(),
            })
    }

    async fn actions_by_registered_event(
        &self,
        org_id: DbId,
        event_name: &str,
    ) -> Result<Vec<Action>, StoreError> {
        let actions = self.actions.read().await;
        let mut subscribed: Vec<Action> = actions
            .values()
            .filter(|a| a.org_id == org_id && a.registered_events.iter().any(|e| e == event_name))
            .cloned()
            .collect();
        subscribed.sort_by_key(|a| a.id);
        Ok(subscribed)
    }

    async fn usage_metrics(&self) -> Result<HashMap<String, serde_json::Value>, StoreError> {
        let actions = self.actions.read().await;
        let events = self.events.read().await;

        let code = actions
            .values()
            .filter(|a| a.action_type == ActionType::Code.as_str())
            .count();
        let webhook = actions
            .values()
            .filter(|a| a.action_type == ActionType::Webhook.as_str())
            .count();

        let mut metrics = HashMap::new();
        metrics.insert(METRIC_ACTIONS_COUNT.to_string(), actions.len().into());
        metrics.insert(METRIC_ACTIONS_CODE_COUNT.to_string(), code.into());
        metrics.insert(METRIC_ACTIONS_WEBHOOK_COUNT.to_string(), webhook.into());
        metrics.insert(METRIC_EVENTS_COUNT.to_string(), events.len().into());
        Ok(metrics)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn event_form(name: &str, org_id: DbId) -> RegisterEventForm {
        RegisterEventForm {
            name: name.to_string(),
            org_id,
        }
    }

    fn webhook_form(name: &str, events: &[&str]) -> CreateActionForm {
        CreateActionForm {
            name: name.to_string(),
            action_type: "webhook".to_string(),
            url: "http://h/hook".to_string(),
            script: String::new(),
            script_language: String::new(),
            runner_secret: String::new(),
            entrypoint: None,
            registered_events: events.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn code_form(name: &str, events: &[&str]) -> CreateActionForm {
        CreateActionForm {
            name: name.to_string(),
            action_type: "code".to_string(),
            url: "http://r".to_string(),
            script: "print(1)".to_string(),
            script_language: "python".to_string(),
            runner_secret: "s3cret".to_string(),
            entrypoint: None,
            registered_events: events.iter().map(|e| e.to_string()).collect(),
        }
    }

    // -- events -----------------------------------------------------------------

    #[tokio::test]
    async fn create_and_list_events() {
        let store = MemoryStore::new();
        store.create_event(event_form("user.created", 1)).await.unwrap();
        store.create_event(event_form("user.deleted", 1)).await.unwrap();
        store.create_event(event_form("user.created", 2)).await.unwrap();

        let listed = store.list_events(1).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "user.created");
        assert_eq!(listed[1].name, "user.deleted");
    }

    #[tokio::test]
    async fn duplicate_event_name_rejected_within_org() {
        let store = MemoryStore::new();
        store.create_event(event_form("user.created", 1)).await.unwrap();

        let err = store
            .create_event(event_form("user.created", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn delete_missing_event_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_event(1, "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    // -- actions ----------------------------------------------------------------

    #[tokio::test]
    async fn create_retrieve_delete_action() {
        let store = MemoryStore::new();
        let action = store
            .create_action(1, webhook_form("notify", &["user.created"]))
            .await
            .unwrap();
        assert_eq!(action.entrypoint, "file1");

        let found = store.action_by_name(1, "notify").await.unwrap();
        assert_eq!(found.id, action.id);

        store.delete_action(1, action.id).await.unwrap();
        assert!(store.action_by_name(1, "notify").await.is_err());
    }

    #[tokio::test]
    async fn delete_action_is_org_scoped() {
        let store = MemoryStore::new();
        let action = store
            .create_action(1, webhook_form("notify", &[]))
            .await
            .unwrap();

        let err = store.delete_action(2, action.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn lookup_by_registered_event_filters_org_and_name() {
        let store = MemoryStore::new();
        store
            .create_action(1, webhook_form("a", &["user.created"]))
            .await
            .unwrap();
        store
            .create_action(1, code_form("b", &["user.created", "user.deleted"]))
            .await
            .unwrap();
        store
            .create_action(1, webhook_form("c", &["user.deleted"]))
            .await
            .unwrap();
        store
            .create_action(2, webhook_form("d", &["user.created"]))
            .await
            .unwrap();

        let subscribed = store
            .actions_by_registered_event(1, "user.created")
            .await
            .unwrap();
        let names: Vec<&str> = subscribed.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn usage_metrics_count_by_type() {
        let store = MemoryStore::new();
        store.create_event(event_form("user.created", 1)).await.unwrap();
        store.create_action(1, webhook_form("a", &[])).await.unwrap();
        store.create_action(1, code_form("b", &[])).await.unwrap();

        let metrics = store.usage_metrics().await.unwrap();
        assert_eq!(metrics[METRIC_ACTIONS_COUNT], 2);
        assert_eq!(metrics[METRIC_ACTIONS_CODE_COUNT], 1);
        assert_eq!(metrics[METRIC_ACTIONS_WEBHOOK_COUNT], 1);
        assert_eq!(metrics[METRIC_EVENTS_COUNT], 1);
    }
}
