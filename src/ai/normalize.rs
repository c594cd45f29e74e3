//! Response Text Normalizer
//!
//! Strips the artifacts models leave in free-text output despite plain-text
//! instructions: JSON wrappers, markdown emphasis, escaped newlines, and code
//! fences. Infallible - always returns a string, possibly empty.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));

/// Normalize a model's free-text section response.
///
/// Applied to every real (non-skipped) section response before persistence.
/// Idempotent on already-clean plain text.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    // Models sometimes wrap a plain-text answer in a JSON object despite
    // instructions. Unwrap the first string-valued property; a failed parse
    // means it probably wasn't JSON after all, so keep the raw text.
    if text.starts_with('{')
        && let Ok(value) = serde_json::from_str::<Value>(&text)
        && let Some(inner) = first_string_property(&value)
    {
        text = inner.to_string();
    }

    // Bold before italic: `**x**` would otherwise leave `*x*` remnants.
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");

    // Literal backslash-n sequences from models escaping their own output.
    let text = text.replace("\\n", "\n");

    strip_fences(&text).trim().to_string()
}

/// First string-valued property in object iteration order (insertion order,
/// via serde_json's preserve_order feature).
fn first_string_property(value: &Value) -> Option<&str> {
    value
        .as_object()?
        .values()
        .find_map(|v| v.as_str())
}

/// Strip a leading and/or trailing three-backtick fence marker (optional
/// language tag) at the very start/end of the string.
fn strip_fences(text: &str) -> String {
    let mut result = text.trim();

    if result.starts_with("```") {
        result = match result.find('\n') {
            Some(newline) => &result[newline + 1..],
            // Opening fence with no body, e.g. "```text```".
            None => result.trim_start_matches('`'),
        };
    }

    let mut result = result.to_string();
    if result.trim_end().ends_with("```") {
        let trimmed = result.trim_end().trim_end_matches('`').to_string();
        result = trimmed;
    }

    result
}
