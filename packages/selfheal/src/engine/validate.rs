//! Result validation.
//!
//! A candidate extraction result is checked before it is trusted or
//! persisted. The checks are shape and range heuristics, not schemas:
//! they exist to catch scripts that silently return the wrong thing
//! after a site layout change.

use serde_json::Value;

use crate::types::task::Expected;

/// Check a candidate result against the task's expected kind.
pub fn is_valid(value: &Value, expected: Expected) -> bool {
    match expected {
        Expected::Text => valid_text(value),
        Expected::Rating => valid_rating(value),
        Expected::RecordList => valid_record_list(value),
        Expected::AnyValue => !value.is_null(),
    }
}

/// Non-empty text that does not look like raw markup.
///
/// A script that accidentally returns an HTML fragment instead of
/// extracted text is rejected here.
fn valid_text(value: &Value) -> bool {
    match value.as_str() {
        Some(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && !(trimmed.contains('<') && trimmed.contains('>'))
        }
        None => false,
    }
}

/// A number in (0, 10]. String payloads are coerced: scrapers routinely
/// hand back "4.3" rather than 4.3.
fn valid_rating(value: &Value) -> bool {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    matches!(parsed, Some(x) if x > 0.0 && x <= 10.0)
}

fn valid_record_list(value: &Value) -> bool {
    value.as_array().is_some_and(|items| !items.is_empty())
}
