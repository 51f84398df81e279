//! Dispatch configuration loaded from environment variables.

use std::time::Duration;

/// Default number of concurrent dispatch workers.
const DEFAULT_WORKERS: usize = 3;

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Tuning knobs for the dispatcher's worker pool.
///
/// All fields have defaults suitable for moderate fan-out; override
/// via environment variables for deployments with many subscribers or
/// slow endpoints.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Size of the worker pool (default: `3`, minimum 1).
    pub workers: usize,
    /// Timeout for a single outbound request in seconds (default: `10`).
    pub request_timeout_secs: u64,
}

impl DispatchConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `PULSE_DISPATCH_WORKERS`     | `3`     |
    /// | `PULSE_REQUEST_TIMEOUT_SECS` | `10`    |
    ///
    /// Unparseable values fall back to the default; a worker count of
    /// zero is clamped to 1.
    pub fn from_env() -> Self {
        let workers = std::env::var("PULSE_DISPATCH_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WORKERS)
            .max(1);

        let request_timeout_secs = std::env::var("PULSE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            workers,
            request_timeout_secs,
        }
    }

    /// The per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_three_workers_ten_seconds() {
        let config = DispatchConfig::default();
        assert_eq!(config.workers, 3);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    // Single test for all env interactions so parallel test runs never
    // race on the same variables.
    #[test]
    fn from_env_reads_overrides_clamps_and_defaults() {
        std::env::remove_var("PULSE_DISPATCH_WORKERS");
        std::env::remove_var("PULSE_REQUEST_TIMEOUT_SECS");
        let config = DispatchConfig::from_env();
        assert_eq!(config.workers, 3);
        assert_eq!(config.request_timeout_secs, 10);

        std::env::set_var("PULSE_DISPATCH_WORKERS", "8");
        std::env::set_var("PULSE_REQUEST_TIMEOUT_SECS", "30");
        let config = DispatchConfig::from_env();
        assert_eq!(config.workers, 8);
        assert_eq!(config.request_timeout_secs, 30);

        std::env::set_var("PULSE_DISPATCH_WORKERS", "0");
        let config = DispatchConfig::from_env();
        assert_eq!(config.workers, 1);

        std::env::set_var("PULSE_DISPATCH_WORKERS", "not-a-number");
        let config = DispatchConfig::from_env();
        assert_eq!(config.workers, 3);

        std::env::remove_var("PULSE_DISPATCH_WORKERS");
        std::env::remove_var("PULSE_REQUEST_TIMEOUT_SECS");
    }
}
