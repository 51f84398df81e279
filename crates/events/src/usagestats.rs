//! Usage-metrics collection registry.
//!
//! Services register a metrics-producing callback once at start;
//! whatever reporting pipeline sits on top calls [`collect`] on its
//! own schedule. Collection never runs on the dispatch hot path.
//!
//! [`collect`]: UsageStatsRegistry::collect

use std::collections::HashMap;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

/// A set of usage-metric values keyed by metric name.
pub type Metrics = HashMap<String, serde_json::Value>;

/// A registered metrics producer.
pub type MetricsFunc = Box<dyn Fn() -> BoxFuture<'static, Metrics> + Send + Sync>;

/// Holds metrics producers registered by services at startup.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`
/// and shared across services.
#[derive(Default)]
pub struct UsageStatsRegistry {
    funcs: RwLock<Vec<MetricsFunc>>,
}

impl UsageStatsRegistry {
    pub fn new() -> Self {
        Self {
            funcs: RwLock::new(Vec::new()),
        }
    }

    /// Register a metrics producer. Intended to be called once per
    /// service at startup.
    pub async fn register_metrics_fn(&self, func: MetricsFunc) {
        self.funcs.write().await.push(func);
    }

    /// Invoke every registered producer and merge the results.
    ///
    /// On key collisions the later registration wins.
    pub async fn collect(&self) -> Metrics {
        let funcs = self.funcs.read().await;
        let mut merged = Metrics::new();
        for func in funcs.iter() {
            merged.extend(func().await);
        }
        merged
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
