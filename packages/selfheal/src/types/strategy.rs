//! Persisted extraction strategies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a strategy.
///
/// Only LLM-generated strategies are ever persisted; hardcoded scripts
/// live in caller code and are passed in per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategySource {
    /// Generated by an LLM at runtime.
    Llm,

    /// Supplied by the caller as a hardcoded fallback.
    Hardcoded,
}

impl StrategySource {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Hardcoded => "hardcoded",
        }
    }

    /// Parse the storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "llm" => Some(Self::Llm),
            "hardcoded" => Some(Self::Hardcoded),
            _ => None,
        }
    }
}

/// A script payload believed to perform one extraction task against the
/// current site layout.
///
/// At most one strategy exists per task at a time; saving under an
/// existing `task_id` replaces the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStrategy {
    /// Task this strategy serves (primary key).
    pub task_id: String,

    /// Executable page-script payload. Opaque to the engine.
    pub js_code: String,

    /// Incremented each time a new strategy replaces an old one for the
    /// same task.
    pub version: i64,

    /// Where the script came from.
    pub source: StrategySource,

    /// When this strategy was created.
    pub created_at: DateTime<Utc>,

    /// When this strategy last produced a validated result.
    pub last_used: Option<DateTime<Utc>>,

    /// Validated successes since the strategy was saved.
    pub success_count: i64,

    /// Consecutive validation failures. Reset on success and on save;
    /// the store purges the row when it reaches the failure threshold.
    pub fail_count: i64,
}

impl ExtractionStrategy {
    /// A freshly generated strategy at the given version.
    pub fn generated(
        task_id: impl Into<String>,
        js_code: impl Into<String>,
        version: i64,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            js_code: js_code.into(),
            version,
            source: StrategySource::Llm,
            created_at: Utc::now(),
            last_used: None,
            success_count: 0,
            fail_count: 0,
        }
    }
}
