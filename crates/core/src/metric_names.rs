//! Usage-metric key constants.
//!
//! Shared between the store (which produces the counts) and the
//! usage-stats registry (which collects them), so the key strings are
//! defined exactly once.

/// Total number of registered actions.
pub const METRIC_ACTIONS_COUNT: &str = "stats.actions.count";

/// Number of registered code-runner actions.
pub const METRIC_ACTIONS_CODE_COUNT: &str = "stats.actions.code.count";

/// Number of registered webhook actions.
pub const METRIC_ACTIONS_WEBHOOK_COUNT: &str = "stats.actions.webhook.count";

/// Total number of registered events.
pub const METRIC_EVENTS_COUNT: &str = "stats.events.count";
