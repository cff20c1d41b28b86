//! The self-healing extraction engine.
//!
//! Resolution runs three tiers in order: the cached strategy for the
//! task, the caller's hardcoded fallback, then a freshly generated
//! script. A result must validate before it is returned or persisted.
//! Generation failures put the task on cooldown so a persistently broken
//! page cannot drain the LLM budget.

mod content;
mod validate;

pub use content::trim_html;
pub use validate::is_valid;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::HealingConfig;
use crate::error::Result;
use crate::prompts;
use crate::traits::generator::ScriptGenerator;
use crate::traits::page::PageSession;
use crate::traits::store::StrategyStore;
use crate::types::strategy::ExtractionStrategy;
use crate::types::task::ExtractionTask;

/// Orchestrates cached → hardcoded → generated strategy resolution.
///
/// One engine instance per process. The cooldown map lives on the
/// instance and does not survive restarts; entries are created only on
/// generation failure and the task cardinality is small, so the map is
/// never evicted.
pub struct HealingEngine<S: StrategyStore> {
    store: S,
    generator: Option<Arc<dyn ScriptGenerator>>,
    config: HealingConfig,
    cooldowns: Mutex<HashMap<String, Instant>>,
}

impl<S: StrategyStore> HealingEngine<S> {
    /// Create an engine with no generator; only the cached and hardcoded
    /// tiers are available.
    pub fn new(store: S) -> Self {
        Self {
            store,
            generator: None,
            config: HealingConfig::default(),
            cooldowns: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a script generator, enabling the generation tier.
    pub fn with_generator(mut self, generator: Arc<dyn ScriptGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override engine tunables.
    pub fn with_config(mut self, config: HealingConfig) -> Self {
        self.config = config;
        self
    }

    /// The underlying strategy store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a task against a live page.
    ///
    /// Returns `Ok(None)` when extraction is unavailable this round -
    /// callers should degrade gracefully, not treat it as a hard error.
    /// Only store I/O failures surface as `Err`.
    pub async fn extract(
        &self,
        page: &dyn PageSession,
        task: &ExtractionTask,
        fallback_js: Option<&str>,
    ) -> Result<Option<Value>> {
        let cached = self.store.get_strategy(&task.task_id).await?;
        let prior_version = cached.as_ref().map(|s| s.version);

        if let Some(strategy) = &cached {
            debug!(task_id = %task.task_id, version = strategy.version, "trying cached strategy");
            if let Some(value) = self.run_script(page, &strategy.js_code).await {
                if is_valid(&value, task.expected) {
                    self.store.record_success(&task.task_id).await?;
                    return Ok(Some(value));
                }
            }
            debug!(task_id = %task.task_id, "cached strategy failed validation");
            self.store.record_failure(&task.task_id).await?;
        }

        if let Some(js) = fallback_js {
            debug!(task_id = %task.task_id, "trying hardcoded fallback");
            if let Some(value) = self.run_script(page, js).await {
                if is_valid(&value, task.expected) {
                    return Ok(Some(value));
                }
            }
        }

        let Some(generator) = &self.generator else {
            return Ok(None);
        };

        if let Some(remaining) = self.cooldown_remaining(&task.task_id) {
            debug!(
                task_id = %task.task_id,
                remaining_secs = remaining.as_secs(),
                "generation on cooldown"
            );
            return Ok(None);
        }

        let html = match page.content().await {
            Ok(html) => trim_html(&html, self.config.max_content_chars),
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "page content unavailable");
                self.set_cooldown(&task.task_id);
                return Ok(None);
            }
        };

        // The most recent script known to fail: the cached one when it
        // existed this call, else the hardcoded fallback that was tried.
        let failed_js = cached.as_ref().map(|s| s.js_code.as_str()).or(fallback_js);

        let generated = match generator.generate(task, &html, failed_js).await {
            Ok(code) => code,
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "script generation failed");
                None
            }
        };
        let code = match generated
            .map(|c| prompts::strip_code_fences(&c))
            .filter(|c| !c.is_empty())
        {
            Some(code) => code,
            None => {
                self.set_cooldown(&task.task_id);
                return Ok(None);
            }
        };

        match self.run_script(page, &code).await {
            Some(value) if is_valid(&value, task.expected) => {
                // Version from the strategy observed at the start of the
                // call, even if record_failure purged it above.
                let version = prior_version.map_or(1, |v| v + 1);
                let strategy = ExtractionStrategy::generated(&task.task_id, &code, version);
                self.store.save_strategy(&strategy).await?;
                info!(task_id = %task.task_id, version, "persisted regenerated strategy");
                Ok(Some(value))
            }
            _ => {
                debug!(task_id = %task.task_id, "generated script failed validation");
                self.set_cooldown(&task.task_id);
                Ok(None)
            }
        }
    }

    /// Run a script against the page, mapping any execution failure to
    /// "no result".
    async fn run_script(&self, page: &dyn PageSession, js_code: &str) -> Option<Value> {
        match page.execute(js_code).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "script execution failed");
                None
            }
        }
    }

    /// Time left on a task's generation cooldown, if one is active.
    pub fn cooldown_remaining(&self, task_id: &str) -> Option<Duration> {
        let cooldowns = self.cooldowns.lock().unwrap();
        let started = cooldowns.get(task_id)?;
        self.config
            .llm_cooldown
            .checked_sub(started.elapsed())
            .filter(|d| !d.is_zero())
    }

    fn set_cooldown(&self, task_id: &str) {
        self.cooldowns
            .lock()
            .unwrap()
            .insert(task_id.to_string(), Instant::now());
    }
}
