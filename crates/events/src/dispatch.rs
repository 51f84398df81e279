//! Concurrent event fan-out.
//!
//! [`Dispatcher::publish`] resolves the actions subscribed to an event
//! and delivers the payload to each of them through a bounded worker
//! pool. Per-action failures are logged and counted, never escalated:
//! one misconfigured action must not block delivery to the others.
//! Only a failure to resolve the subscriber list aborts a publish.
//!
//! The worker futures are joined inside `publish` rather than detached
//! onto the runtime, so cancelling (dropping) the publish future also
//! cancels its in-flight requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex};

use pulse_core::types::DbId;
use pulse_store::error::StoreError;
use pulse_store::models::Action;
use pulse_store::store::ActionStore;

use crate::config::DispatchConfig;
use crate::envelope::PublishEnvelope;
use crate::executor::{ActionExecutor, ExecuteError, RunResult};
use crate::request::{self, BuildError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that abort an entire publish.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The subscriber list could not be fetched. Nothing was dispatched.
    #[error("Cannot resolve subscribed actions: {0}")]
    Resolution(#[from] StoreError),
}

/// Failure of a single action execution. Logged by the worker, never
/// propagated past it.
#[derive(Debug, thiserror::Error)]
enum ActionRunError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

// ---------------------------------------------------------------------------
// PublishReport
// ---------------------------------------------------------------------------

/// Aggregate outcome of one publish.
///
/// `delivered` counts actions whose endpoint answered with a 2xx
/// status; everything else (build failure, transport failure, non-2xx
/// response) lands in `failed`.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub event_name: String,
    pub org_id: DbId,
    pub actions: usize,
    pub workers: usize,
    pub delivered: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Fans one event out to every subscribed action concurrently.
pub struct Dispatcher {
    store: Arc<dyn ActionStore>,
    executor: ActionExecutor,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher with an executor configured from `config`.
    pub fn new(store: Arc<dyn ActionStore>, config: DispatchConfig) -> Self {
        let executor = ActionExecutor::new(config.request_timeout());
        Self {
            store,
            executor,
            config,
        }
    }

    /// Create a dispatcher reusing an existing executor.
    pub fn with_executor(
        store: Arc<dyn ActionStore>,
        executor: ActionExecutor,
        config: DispatchConfig,
    ) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    /// Publish an event to every action subscribed to it.
    ///
    /// Resolves the subscriber list, then drains it through a pool of
    /// `config.workers` concurrent workers. Blocks until the pool has
    /// drained the queue. Returns an error only if resolution itself
    /// fails; individual action outcomes are logged and tallied in the
    /// returned [`PublishReport`].
    pub async fn publish(
        &self,
        org_id: DbId,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<PublishReport, PublishError> {
        let actions = self
            .store
            .actions_by_registered_event(org_id, event_name)
            .await
            .map_err(|err| {
                tracing::error!(
                    error = %err,
                    org_id,
                    event = event_name,
                    "Failed to resolve subscribed actions"
                );
                PublishError::Resolution(err)
            })?;

        let start = Instant::now();
        let action_count = actions.len();
        let worker_count = self.config.workers.max(1);

        if actions.is_empty() {
            tracing::debug!(event = event_name, org_id, "No subscribed actions, nothing to dispatch");
            return Ok(PublishReport {
                event_name: event_name.to_string(),
                org_id,
                actions: 0,
                workers: worker_count,
                delivered: 0,
                failed: 0,
                elapsed: start.elapsed(),
            });
        }

        // Shared read-only for the whole publish; workers never mutate it.
        let envelope = Arc::new(PublishEnvelope::new(event_name, org_id, payload));

        // Buffered to the full action count so enqueueing is decoupled
        // from pool throughput; dropping the sender closes the queue,
        // which is the pool's only termination signal.
        let (tx, rx) = mpsc::channel(action_count);
        for action in actions {
            tx.send(action)
                .await
                .expect("action queue receiver is alive until the pool drains it");
        }
        drop(tx);

        let queue = Arc::new(Mutex::new(rx));
        let workers = (0..worker_count).map(|_| {
            let queue = Arc::clone(&queue);
            let envelope = Arc::clone(&envelope);
            async move {
                let mut delivered = 0usize;
                let mut failed = 0usize;
                loop {
                    // Hold the lock only while pulling the next action.
                    let action = { queue.lock().await.recv().await };
                    let Some(action) = action else { break };

                    match self.run_action(&envelope, &action).await {
                        Ok(result) if result.is_success() => {
                            tracing::info!(
                                action = %action.name,
                                event = %envelope.event_name,
                                status = result.status_code,
                                "Action executed"
                            );
                            delivered += 1;
                        }
                        Ok(result) => {
                            tracing::warn!(
                                action = %action.name,
                                event = %envelope.event_name,
                                status = result.status_code,
                                body = %result.body,
                                "Action endpoint returned non-success status"
                            );
                            failed += 1;
                        }
                        Err(err) => {
                            tracing::error!(
                                error = %err,
                                action = %action.name,
                                event = %envelope.event_name,
                                org_id = envelope.org_id,
                                "Running action failed"
                            );
                            failed += 1;
                        }
                    }
                }
                (delivered, failed)
            }
        });

        // Workers report their tallies back; the join aggregates them,
        // so no shared mutable counters are needed.
        let tallies = futures::future::join_all(workers).await;
        let (delivered, failed) = tallies
            .into_iter()
            .fold((0, 0), |(d, f), (wd, wf)| (d + wd, f + wf));

        let elapsed = start.elapsed();
        tracing::info!(
            event = event_name,
            org_id,
            actions = action_count,
            workers = worker_count,
            delivered,
            failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Event published"
        );

        Ok(PublishReport {
            event_name: event_name.to_string(),
            org_id,
            actions: action_count,
            workers: worker_count,
            delivered,
            failed,
            elapsed,
        })
    }

    /// Build and execute the request for one action.
    async fn run_action(
        &self,
        envelope: &PublishEnvelope,
        action: &Action,
    ) -> Result<RunResult, ActionRunError> {
        let request = request::build_request(self.executor.client(), envelope, action)?;
        let result = self.executor.execute(request).await?;
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
