//! Pulse event publish/dispatch engine.
//!
//! This crate fans a published event out to every subscribed action
//! concurrently, without letting one slow or failing action block the
//! others:
//!
//! - [`PublishEnvelope`] — the read-only event payload shared across
//!   workers for the duration of one publish.
//! - [`request`] — pure builders that turn an envelope and an action
//!   definition into a protocol-specific outbound request (webhook
//!   JSON POST, or multipart code-runner invocation).
//! - [`ActionExecutor`] — performs one built request over a shared
//!   HTTP client and normalizes the outcome.
//! - [`Dispatcher`] — the bounded worker pool that drains the action
//!   queue and isolates per-action failures.
//! - [`EventsService`] / [`ActionsService`] — thin façades over the
//!   storage collaborator.
//! - [`UsageStatsRegistry`] — collects usage-metric producers off the
//!   dispatch hot path.

pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod executor;
pub mod request;
pub mod service;
pub mod usagestats;

pub use config::DispatchConfig;
pub use dispatch::{Dispatcher, PublishError, PublishReport};
pub use envelope::PublishEnvelope;
pub use executor::{ActionExecutor, ExecuteError, RunResult};
pub use request::BuildError;
pub use service::{ActionsService, EventsService};
pub use usagestats::UsageStatsRegistry;
