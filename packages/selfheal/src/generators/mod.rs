//! Provider adapters for the script-generation capability.
//!
//! The provider is chosen once at configuration time; the engine only
//! ever sees the `ScriptGenerator` trait.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicGenerator;
