//! Pulling a JSON object out of model text.
//!
//! Models asked for JSON mostly return just JSON, but some wrap it in a
//! markdown fence or add a sentence around it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

/// Find the JSON object in `text`: direct parse, then a fenced block, then
/// the largest balanced `{ ... }`.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<JsonValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // 1) direct parse
    if let Ok(js @ JsonValue::Object(_)) = serde_json::from_str::<JsonValue>(text) {
        return Some(js);
    }
    // 2) fenced ```json
    if let Some(js) = extract_fenced_json(text)
        .and_then(|s| serde_json::from_str::<JsonValue>(&s).ok())
        .filter(JsonValue::is_object)
    {
        return Some(js);
    }
    // 3) balanced object fallback
    extract_largest_json_object(text)
        .and_then(|s| serde_json::from_str::<JsonValue>(&s).ok())
        .filter(JsonValue::is_object)
}

/// Extract JSON object from a ```json ... ``` fenced block.
/// Accepts ```json``` or plain ``` ``` fences (case-insensitive).
#[must_use]
pub fn extract_fenced_json(s: &str) -> Option<String> {
    static FENCE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)```(?:json)?\s*(\{.*\})\s*```").unwrap());

    FENCE_RE
        .captures(s)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Fallback: find the *largest* balanced `{ ... }` object in text.
/// String-aware, so braces inside quotes don't count.
#[must_use]
pub fn extract_largest_json_object(s: &str) -> Option<String> {
    let mut best: Option<(usize, usize)> = None;
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;
    let mut in_str = false;
    let mut esc = false;

    for (i, ch) in s.char_indices() {
        if in_str {
            if esc {
                esc = false;
            } else if ch == '\\' {
                esc = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_str = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(st) = start.take()
                    && best.is_none_or(|(a, b)| i - st > b - a)
                {
                    best = Some((st, i));
                }
            }
            _ => {}
        }
    }

    best.map(|(a, b)| s[a..=b].to_string())
}
