//! Engine configuration.

use std::time::Duration;

/// Tunables for the healing engine.
#[derive(Debug, Clone)]
pub struct HealingConfig {
    /// How long the generation tier stays suppressed for a task after a
    /// generation failure.
    ///
    /// Bounds LLM call volume when a site is persistently broken.
    /// Default: 600 seconds.
    pub llm_cooldown: Duration,

    /// Maximum characters of trimmed page markup sent to the generator.
    ///
    /// Default: 15_000.
    pub max_content_chars: usize,
}

impl Default for HealingConfig {
    fn default() -> Self {
        Self {
            llm_cooldown: Duration::from_secs(600),
            max_content_chars: 15_000,
        }
    }
}

impl HealingConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generation cooldown window.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.llm_cooldown = cooldown;
        self
    }

    /// Set the trimmed-markup size cap.
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }
}
