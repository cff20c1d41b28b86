//! Page-execution capability.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PageResult;

/// A live, already-navigated page that can run scripts and dump its
/// rendered markup.
///
/// Implementations typically wrap a headless-browser page handle.
/// `execute` returns whatever JSON-compatible value the script produced;
/// `None` means the script evaluated to null or undefined.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Run a script against the page and return its value.
    async fn execute(&self, script: &str) -> PageResult<Option<Value>>;

    /// Full rendered markup of the page.
    async fn content(&self) -> PageResult<String>;
}
