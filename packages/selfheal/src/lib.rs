//! Self-Healing Web Extraction Strategy Engine
//!
//! Keeps scraping and booking automation working as target sites change
//! their DOM, without code redeploys. Each extraction need is a named
//! task; the engine resolves it through three tiers:
//!
//! 1. **Cached** - the strategy persisted from an earlier run
//! 2. **Hardcoded** - a caller-supplied fallback script
//! 3. **Generated** - a fresh script produced by an LLM from the live
//!    page markup, persisted once it validates
//!
//! Every candidate result is validated against the task's expected kind
//! before it is trusted. A cached strategy that keeps failing is purged
//! after three strikes, and a task whose generation keeps failing is put
//! on cooldown so a persistently broken site cannot drain the LLM
//! budget.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use selfheal::{Expected, ExtractionTask, HealingEngine, SqliteStrategyStore};
//! use selfheal::generators::OpenAiGenerator;
//!
//! let store = SqliteStrategyStore::new("sqlite:./strategies.db?mode=rwc").await?;
//! let engine = HealingEngine::new(store)
//!     .with_generator(Arc::new(OpenAiGenerator::from_env()?));
//!
//! let task = ExtractionTask::new(
//!     "cgv_movie_rating",
//!     "https://example.com/movie/1",
//!     "the audience rating of the movie",
//! )
//! .expecting(Expected::Rating);
//!
//! // `page` is any PageSession over an already-navigated page
//! match engine.extract(&page, &task, Some(RATING_FALLBACK_JS)).await? {
//!     Some(rating) => println!("rating: {rating}"),
//!     None => println!("extraction unavailable this round"),
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability seams (StrategyStore, PageSession, ScriptGenerator)
//! - [`types`] - Tasks and persisted strategies
//! - [`engine`] - Tier resolution, validation, cooldown
//! - [`stores`] - Storage implementations (memory, sqlite)
//! - [`generators`] - Provider adapters (feature-gated)
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod prompts;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::HealingConfig;
pub use engine::{is_valid, trim_html, HealingEngine};
pub use error::{GenerationError, HealingError, PageError, Result};
pub use traits::{
    generator::ScriptGenerator,
    page::PageSession,
    store::{StrategyStore, MAX_FAILURES},
};
pub use types::{
    strategy::{ExtractionStrategy, StrategySource},
    task::{Expected, ExtractionTask},
};

// Re-export stores
pub use stores::MemoryStrategyStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStrategyStore;

// Re-export provider adapters
#[cfg(feature = "openai")]
pub use generators::OpenAiGenerator;

#[cfg(feature = "anthropic")]
pub use generators::AnthropicGenerator;

// Re-export testing utilities
pub use testing::{MockGenerator, MockPageSession};
