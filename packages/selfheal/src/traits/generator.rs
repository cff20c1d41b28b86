//! LLM script-generation capability.

use async_trait::async_trait;

use crate::error::GenerationResult;
use crate::types::task::ExtractionTask;

/// Generates an extraction script for a task from trimmed page markup.
///
/// `failed_js` carries the script that most recently failed validation,
/// so the provider can steer away from repeating the same mistake.
///
/// `Ok(None)` means "no usable script this round". Adapters report
/// provider flakiness (transport errors, empty or malformed responses)
/// that way rather than as errors, so the engine can put the task on
/// cooldown and move on.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Produce a script payload, or nothing.
    async fn generate(
        &self,
        task: &ExtractionTask,
        html: &str,
        failed_js: Option<&str>,
    ) -> GenerationResult<Option<String>>;
}
