//! Strategy persistence trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::strategy::ExtractionStrategy;

/// Consecutive validation failures after which a stored strategy is
/// purged, forcing the next attempt to regenerate from scratch.
pub const MAX_FAILURES: i64 = 3;

/// Durable cache of extraction strategies keyed by task id.
///
/// Invariant: at most one strategy row exists per task at any time.
/// Implementations must tolerate concurrent calls across different
/// tasks; concurrent writers to the same task are not coordinated
/// (last writer wins).
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// Get the live strategy for a task, if any. No side effects.
    async fn get_strategy(&self, task_id: &str) -> Result<Option<ExtractionStrategy>>;

    /// Upsert by task id.
    ///
    /// Inserting starts both counters at zero. Replacing an existing row
    /// overwrites the script, version, source and creation time, and
    /// resets `fail_count` - but keeps the accumulated `success_count`
    /// and `last_used`: success history survives replacement, failure
    /// history does not.
    async fn save_strategy(&self, strategy: &ExtractionStrategy) -> Result<()>;

    /// Record a validated success. No-op when the task has no stored
    /// strategy. Increments `success_count`, resets `fail_count`, stamps
    /// `last_used`.
    async fn record_success(&self, task_id: &str) -> Result<()>;

    /// Record a validation failure. Once `fail_count` reaches
    /// [`MAX_FAILURES`] the row is deleted outright - the self-healing
    /// trigger.
    async fn record_failure(&self, task_id: &str) -> Result<()>;

    /// Release underlying storage resources. Idempotent.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
