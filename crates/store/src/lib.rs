//! Pulse storage collaborator.
//!
//! The engine never talks to a database directly; it goes through the
//! [`EventStore`] and [`ActionStore`] traits defined here. This crate
//! also ships [`MemoryStore`], a thread-safe in-memory backend used by
//! tests and as the reference implementation of the store semantics
//! (duplicate names, not-found translation, lookup by registered event).

pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{Action, CreateActionForm, Event, RegisterEventForm};
pub use store::{ActionStore, EventStore};
