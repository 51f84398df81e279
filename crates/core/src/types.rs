//! Shared primitive type aliases.

use chrono::{DateTime, Utc};

/// Database-style identifier used for events, actions, and orgs.
pub type DbId = i64;

/// Canonical timestamp type (UTC).
pub type Timestamp = DateTime<Utc>;
