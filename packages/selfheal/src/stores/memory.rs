//! In-memory strategy store.
//!
//! Useful for testing and development. Not suitable for production as
//! strategies are lost on restart - which defeats the point of caching
//! regenerated scripts.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::{StrategyStore, MAX_FAILURES};
use crate::types::strategy::ExtractionStrategy;

/// In-memory store keyed by task id.
pub struct MemoryStrategyStore {
    strategies: RwLock<HashMap<String, ExtractionStrategy>>,
}

impl Default for MemoryStrategyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStrategyStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live strategies.
    pub fn strategy_count(&self) -> usize {
        self.strategies.read().unwrap().len()
    }

    /// Clear all stored strategies.
    pub fn clear(&self) {
        self.strategies.write().unwrap().clear();
    }
}

#[async_trait]
impl StrategyStore for MemoryStrategyStore {
    async fn get_strategy(&self, task_id: &str) -> Result<Option<ExtractionStrategy>> {
        Ok(self.strategies.read().unwrap().get(task_id).cloned())
    }

    async fn save_strategy(&self, strategy: &ExtractionStrategy) -> Result<()> {
        let mut strategies = self.strategies.write().unwrap();

        let mut row = strategy.clone();
        row.fail_count = 0;
        if let Some(existing) = strategies.get(&strategy.task_id) {
            // Success history survives replacement; failure history does not
            row.success_count = existing.success_count;
            row.last_used = existing.last_used;
        } else {
            row.success_count = 0;
            row.last_used = None;
        }

        strategies.insert(strategy.task_id.clone(), row);
        Ok(())
    }

    async fn record_success(&self, task_id: &str) -> Result<()> {
        let mut strategies = self.strategies.write().unwrap();
        if let Some(row) = strategies.get_mut(task_id) {
            row.success_count += 1;
            row.fail_count = 0;
            row.last_used = Some(Utc::now());
        }
        Ok(())
    }

    async fn record_failure(&self, task_id: &str) -> Result<()> {
        let mut strategies = self.strategies.write().unwrap();
        if let Some(row) = strategies.get_mut(task_id) {
            row.fail_count += 1;
            if row.fail_count >= MAX_FAILURES {
                strategies.remove(task_id);
            }
        }
        Ok(())
    }
}
