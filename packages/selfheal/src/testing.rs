//! Testing utilities including mock implementations.
//!
//! These are useful for exercising the engine without a real browser or
//! LLM provider. Both mocks record their calls so tests can assert tier
//! ordering and generation suppression.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::{GenerationResult, PageError, PageResult};
use crate::traits::generator::ScriptGenerator;
use crate::traits::page::PageSession;
use crate::types::task::ExtractionTask;

/// A mock page session with canned per-script results.
#[derive(Default)]
pub struct MockPageSession {
    /// Markup returned by `content()`
    html: String,

    /// Canned results by script
    results: RwLock<HashMap<String, Value>>,

    /// Scripts that fail with an execution error
    failing: RwLock<HashSet<String>>,

    /// Whether `content()` fails
    content_fails: bool,

    /// Call tracking for assertions
    calls: RwLock<Vec<PageCall>>,
}

/// Record of a call made to the mock page.
#[derive(Debug, Clone)]
pub enum PageCall {
    Execute { script: String },
    Content,
}

impl MockPageSession {
    /// Create a new mock page with empty markup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the markup returned by `content()`.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Add a canned result for a script. Scripts without one evaluate
    /// to nothing.
    pub fn with_result(self, script: impl Into<String>, result: Value) -> Self {
        self.results.write().unwrap().insert(script.into(), result);
        self
    }

    /// Make a script fail with an execution error.
    pub fn fail_script(self, script: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(script.into());
        self
    }

    /// Make `content()` fail.
    pub fn fail_content(mut self) -> Self {
        self.content_fails = true;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<PageCall> {
        self.calls.read().unwrap().clone()
    }

    /// Scripts executed, in order.
    pub fn executed_scripts(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                PageCall::Execute { script } => Some(script.clone()),
                PageCall::Content => None,
            })
            .collect()
    }
}

#[async_trait]
impl PageSession for MockPageSession {
    async fn execute(&self, script: &str) -> PageResult<Option<Value>> {
        self.calls.write().unwrap().push(PageCall::Execute {
            script: script.to_string(),
        });

        if self.failing.read().unwrap().contains(script) {
            return Err(PageError::Script("mock script failure".to_string()));
        }

        Ok(self.results.read().unwrap().get(script).cloned())
    }

    async fn content(&self) -> PageResult<String> {
        self.calls.write().unwrap().push(PageCall::Content);

        if self.content_fails {
            return Err(PageError::Content("mock content failure".to_string()));
        }

        Ok(self.html.clone())
    }
}

/// A mock script generator with canned per-task scripts.
///
/// Tasks without a canned script get `None`, mimicking a provider that
/// produced nothing usable.
#[derive(Default)]
pub struct MockGenerator {
    /// Canned scripts by task id
    scripts: RwLock<HashMap<String, String>>,

    /// Call tracking for assertions
    calls: RwLock<Vec<GeneratorCall>>,
}

/// Record of a call made to the mock generator.
#[derive(Debug, Clone)]
pub struct GeneratorCall {
    pub task_id: String,
    pub had_failed_js: bool,
    pub html_len: usize,
}

impl MockGenerator {
    /// Create a new mock generator that produces nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned script for a task.
    pub fn with_script(self, task_id: impl Into<String>, script: impl Into<String>) -> Self {
        self.scripts
            .write()
            .unwrap()
            .insert(task_id.into(), script.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of generation calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl ScriptGenerator for MockGenerator {
    async fn generate(
        &self,
        task: &ExtractionTask,
        html: &str,
        failed_js: Option<&str>,
    ) -> GenerationResult<Option<String>> {
        self.calls.write().unwrap().push(GeneratorCall {
            task_id: task.task_id.clone(),
            had_failed_js: failed_js.is_some(),
            html_len: html.len(),
        });

        Ok(self.scripts.read().unwrap().get(&task.task_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_page_canned_results() {
        let page = MockPageSession::new()
            .with_result("document.title", json!("CGV 용산아이파크몰"));

        let value = page.execute("document.title").await.unwrap();
        assert_eq!(value, Some(json!("CGV 용산아이파크몰")));

        let missing = page.execute("document.other").await.unwrap();
        assert!(missing.is_none());

        assert_eq!(page.executed_scripts().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_page_failing_script() {
        let page = MockPageSession::new().fail_script("broken()");
        assert!(page.execute("broken()").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_page_content() {
        let page = MockPageSession::new().with_html("<html></html>");
        assert_eq!(page.content().await.unwrap(), "<html></html>");

        let failing = MockPageSession::new().fail_content();
        assert!(failing.content().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_generator_tracks_calls() {
        let generator = MockGenerator::new().with_script("t1", "document.title");
        let task = ExtractionTask::new("t1", "https://example.com", "the title");

        let code = generator
            .generate(&task, "<html></html>", Some("old.js"))
            .await
            .unwrap();
        assert_eq!(code.as_deref(), Some("document.title"));

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].task_id, "t1");
        assert!(calls[0].had_failed_js);
    }

    #[tokio::test]
    async fn test_mock_generator_unknown_task_yields_nothing() {
        let generator = MockGenerator::new();
        let task = ExtractionTask::new("unknown", "https://example.com", "anything");

        let code = generator.generate(&task, "", None).await.unwrap();
        assert!(code.is_none());
        assert_eq!(generator.call_count(), 1);
    }
}
