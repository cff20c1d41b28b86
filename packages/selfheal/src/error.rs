//! Typed errors for the self-healing engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep failures
//! strongly typed at the capability seams.
//!
//! Only storage failures ever escape the engine's `extract`: page and
//! generation failures are expected, recoverable conditions and surface
//! as an absent result.

use thiserror::Error;

/// Errors surfaced by the healing engine and strategy stores.
#[derive(Debug, Error)]
pub enum HealingError {
    /// Strategy store I/O failed (fatal for the current call)
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Page-level operation failed
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Script generation failed
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Engine or adapter misconfiguration
    #[error("config error: {0}")]
    Config(String),
}

/// Errors from the page-execution capability.
///
/// The engine swallows these during tier resolution: a script that throws
/// is indistinguishable from a script that found nothing.
#[derive(Debug, Error)]
pub enum PageError {
    /// Script evaluation threw inside the page
    #[error("script failed: {0}")]
    Script(String),

    /// Page content could not be retrieved
    #[error("content unavailable: {0}")]
    Content(String),

    /// The underlying browser session is gone
    #[error("session closed")]
    SessionClosed,
}

/// Errors from the LLM-generation capability.
///
/// Provider flakiness (transport errors, malformed bodies) is handled
/// inside adapters and reported as "no script"; these variants cover
/// misconfiguration surfaced at construction or genuinely unexpected
/// provider behavior.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider transport failed
    #[error("provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider response could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Adapter misconfiguration (missing key, bad base URL)
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for engine and store operations.
pub type Result<T> = std::result::Result<T, HealingError>;

/// Result type alias for page operations.
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Result type alias for generation operations.
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
