//! Pulse core domain types.
//!
//! Zero internal dependencies by design: every other crate in the
//! workspace depends on `pulse-core`, never the other way around.
//! Provides shared id/timestamp aliases, the [`CoreError`] type, the
//! [`ActionType`] tagged variant with its validation rules, and the
//! usage-metric key constants.
//!
//! [`CoreError`]: error::CoreError
//! [`ActionType`]: actions::ActionType

pub mod actions;
pub mod error;
pub mod metric_names;
pub mod types;
