//! Service façades over the storage collaborator.
//!
//! [`EventsService`] and [`ActionsService`] hold no business logic
//! beyond input validation and error translation; registration,
//! lookup, and deletion are delegated to the store, and publishing is
//! delegated to the [`Dispatcher`].

use std::sync::Arc;

use pulse_core::types::DbId;
use pulse_store::error::StoreError;
use pulse_store::models::{Action, CreateActionForm, Event, RegisterEventForm};
use pulse_store::store::{ActionStore, EventStore};

use crate::dispatch::{Dispatcher, PublishError, PublishReport};
use crate::usagestats::{Metrics, UsageStatsRegistry};

// ---------------------------------------------------------------------------
// EventsService
// ---------------------------------------------------------------------------

/// Register / list / unregister events, and publish to their
/// subscribers.
pub struct EventsService {
    store: Arc<dyn EventStore>,
    dispatcher: Dispatcher,
}

impl EventsService {
    pub fn new(store: Arc<dyn EventStore>, dispatcher: Dispatcher) -> Self {
        tracing::info!("Registering events service");
        Self { store, dispatcher }
    }

    /// Register a new event name.
    pub async fn register(&self, form: RegisterEventForm) -> Result<Event, StoreError> {
        let name = form.name.clone();
        match self.store.create_event(form).await {
            Ok(event) => {
                tracing::info!(name = %event.name, org_id = event.org_id, "Event registered");
                Ok(event)
            }
            Err(err) => {
                tracing::error!(error = %err, name = %name, "Failed to register event");
                Err(err)
            }
        }
    }

    /// List all events registered in an org.
    pub async fn list(&self, org_id: DbId) -> Result<Vec<Event>, StoreError> {
        self.store.list_events(org_id).await
    }

    /// Unregister an event by name.
    pub async fn unregister(&self, org_id: DbId, name: &str) -> Result<(), StoreError> {
        self.store.delete_event(org_id, name).await?;
        tracing::info!(name, org_id, "Event unregistered");
        Ok(())
    }

    /// Publish an event to every subscribed action.
    pub async fn publish(
        &self,
        org_id: DbId,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<PublishReport, PublishError> {
        self.dispatcher.publish(org_id, event_name, payload).await
    }
}

// ---------------------------------------------------------------------------
// ActionsService
// ---------------------------------------------------------------------------

/// Create / delete / retrieve action definitions.
pub struct ActionsService {
    store: Arc<dyn ActionStore>,
}

impl ActionsService {
    pub fn new(store: Arc<dyn ActionStore>) -> Self {
        tracing::info!("Registering event actions service");
        Self { store }
    }

    /// Register this service's usage-metrics producer. Called once at
    /// startup.
    pub async fn register_usage_metrics(&self, usage: &UsageStatsRegistry) {
        let store = Arc::clone(&self.store);
        usage
            .register_metrics_fn(Box::new(move || {
                let store = Arc::clone(&store);
                Box::pin(async move {
                    match store.usage_metrics().await {
                        Ok(metrics) => metrics,
                        Err(err) => {
                            tracing::error!(error = %err, "Failed to collect usage metrics");
                            Metrics::new()
                        }
                    }
                })
            }))
            .await;
    }

    /// Create an action definition after validating the form.
    pub async fn create(
        &self,
        org_id: DbId,
        form: CreateActionForm,
    ) -> Result<Action, StoreError> {
        form.validate()?;
        let action = self.store.create_action(org_id, form).await?;
        tracing::info!(
            action = %action.name,
            action_type = %action.action_type,
            org_id,
            "Action created"
        );
        Ok(action)
    }

    /// Delete an action by id.
    pub async fn delete(&self, org_id: DbId, id: DbId) -> Result<(), StoreError> {
        self.store.delete_action(org_id, id).await?;
        tracing::info!(action_id = id, org_id, "Action deleted");
        Ok(())
    }

    /// Retrieve an action by name.
    pub async fn by_name(&self, org_id: DbId, name: &str) -> Result<Action, StoreError> {
        self.store.action_by_name(org_id, name).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
