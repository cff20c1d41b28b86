//! Page-markup trimming for generation prompts.
//!
//! Full rendered pages routinely run to hundreds of kilobytes. Script
//! and style blocks carry no extractable data and dominate the byte
//! count, so they are dropped before the size cap is applied.

use regex::Regex;
use std::sync::OnceLock;

fn script_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap())
}

fn style_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap())
}

fn comment_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Trim rendered markup to at most `max_chars` bytes of structure.
///
/// Drops script/style blocks and HTML comments, collapses whitespace,
/// then truncates on a char boundary.
pub fn trim_html(html: &str, max_chars: usize) -> String {
    let stripped = script_pattern().replace_all(html, "");
    let stripped = style_pattern().replace_all(&stripped, "");
    let stripped = comment_pattern().replace_all(&stripped, "");
    let collapsed = whitespace_pattern().replace_all(&stripped, " ");
    let collapsed = collapsed.trim();

    if collapsed.len() <= max_chars {
        return collapsed.to_string();
    }

    let mut end = max_chars;
    while end > 0 && !collapsed.is_char_boundary(end) {
        end -= 1;
    }
    collapsed[..end].to_string()
}
