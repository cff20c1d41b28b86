//! Extraction tasks - named units of "what data to pull from what kind of page".
//!
//! A task is stable across runs and independent of any specific DOM
//! structure; the `task_id` is the cache key for strategies.

use serde::{Deserialize, Serialize};

/// Validation kind for an extraction result.
///
/// A closed set instead of free-form type strings, so dispatch is
/// exhaustive at compile time. Anything a caller cannot express here
/// should use [`Expected::AnyValue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expected {
    /// Non-empty plain text that is not raw markup.
    Text,

    /// A number in (0, 10] - rating-style values.
    Rating,

    /// A non-empty list of records. Element shape is not deep-checked.
    RecordList,

    /// Anything non-null.
    #[default]
    AnyValue,
}

impl Expected {
    /// Human-readable label used in generation prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "a plain text string",
            Self::Rating => "a number between 0 and 10",
            Self::RecordList => "a non-empty array of objects",
            Self::AnyValue => "any JSON value",
        }
    }
}

/// One logical extraction need, constructed by the caller per attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionTask {
    /// Stable identifier grouping this extraction across runs (cache key).
    pub task_id: String,

    /// Page the task applies to. Informational, not enforced.
    pub url: String,

    /// Natural-language statement of what to extract. Consumed only by
    /// the generation path.
    pub description: String,

    /// Governs result validation.
    #[serde(default)]
    pub expected: Expected,

    /// Example of a good result, shown to the generator.
    pub example_result: Option<String>,

    /// Extra validation guidance, shown to the generator.
    pub validation_hint: Option<String>,
}

impl ExtractionTask {
    /// Create a task with permissive validation.
    pub fn new(
        task_id: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            url: url.into(),
            description: description.into(),
            expected: Expected::AnyValue,
            example_result: None,
            validation_hint: None,
        }
    }

    /// Set the expected result kind.
    pub fn expecting(mut self, expected: Expected) -> Self {
        self.expected = expected;
        self
    }

    /// Attach an example result for the generator.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example_result = Some(example.into());
        self
    }

    /// Attach a validation hint for the generator.
    pub fn with_validation_hint(mut self, hint: impl Into<String>) -> Self {
        self.validation_hint = Some(hint.into());
        self
    }
}
