//! Prompts for extraction-script generation.

use crate::types::task::ExtractionTask;

/// System prompt for script generation.
pub const GENERATION_SYSTEM_PROMPT: &str = r#"You write small browser extraction scripts.

Rules:
1. Output a single JavaScript expression or IIFE, no commentary
2. The script runs in the page context through an evaluate() call and must return a JSON-serializable value
3. Return null when the target data is absent, never throw
4. Prefer stable anchors (ids, data attributes, semantic tags) over positional selectors or generated class names
5. Do not navigate, click, or mutate the page"#;

/// Build the user prompt for one generation attempt.
///
/// `failed_js` is the script that most recently failed validation for
/// this task, included so the model avoids producing the same selector
/// again.
pub fn format_generation_prompt(
    task: &ExtractionTask,
    html: &str,
    failed_js: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Task: {}\nPage URL: {}\nExpected result: {}\n",
        task.description,
        task.url,
        task.expected.label(),
    );

    if let Some(example) = &task.example_result {
        prompt.push_str(&format!("Example result: {}\n", example));
    }
    if let Some(hint) = &task.validation_hint {
        prompt.push_str(&format!("Validation hint: {}\n", hint));
    }
    if let Some(failed) = failed_js {
        prompt.push_str(&format!(
            "\nThis script no longer works on the current page; take a different approach:\n{}\n",
            failed
        ));
    }

    prompt.push_str(&format!("\nPage markup (trimmed):\n{}", html));
    prompt
}

/// Strip Markdown code fences from model output.
///
/// Providers wrap code in ``` blocks more often than not, instruction or
/// no instruction.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // The opening fence line may carry a language tag
    let body = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => return String::new(),
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}
