//! Counter store boundary.
//!
//! The engine is storage-agnostic: it depends only on the [`CounterStore`]
//! increment contract. Persistent and distributed implementations live with
//! the deployment; [`InMemoryCounterStore`] ships here for tests and
//! single-process use.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::fieldtally::error::TallyResult;

/// Contract for a named counter store keyed by distinct observed values.
///
/// Each `increment` call represents exactly one logical occurrence; the
/// store is responsible for atomically bumping the per-(counter, value)
/// tally. Implementations must be safe for concurrent invocation from
/// multiple tasks with overlapping counter names.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Record one occurrence of `value` under the named counter.
    async fn increment(&self, counter_name: &str, value: &str) -> TallyResult<()>;
}

/// In-memory counter store backed by nested maps behind an async lock.
///
/// Suitable for tests and single-process pipelines; tallies do not survive
/// a restart.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: RwLock<HashMap<String, HashMap<String, u64>>>,
}

impl InMemoryCounterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tally for one (counter, value) pair; zero when never seen
    pub async fn get(&self, counter_name: &str, value: &str) -> u64 {
        let counters = self.counters.read().await;
        counters
            .get(counter_name)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Snapshot of all tallies under one counter name
    pub async fn counts_for(&self, counter_name: &str) -> HashMap<String, u64> {
        let counters = self.counters.read().await;
        counters.get(counter_name).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, counter_name: &str, value: &str) -> TallyResult<()> {
        let mut counters = self.counters.write().await;
        let tally = counters
            .entry(counter_name.to_string())
            .or_default()
            .entry(value.to_string())
            .or_insert(0);
        *tally += 1;
        Ok(())
    }
}
