//! Normalization of raw model output into structured results.
//!
//! Local models rarely honor "return only JSON" instructions. The tag parser
//! here accepts prose-wrapped arrays, `{"tags": [...]}` wrappers, bare
//! objects, and concatenated objects without separators, and degrades to an
//! empty list when nothing can be recovered. Text cleanup for corrections
//! strips the conversational prefixes and wrapping quotes models like to add.
//! None of this ever returns an error.

use regex::Regex;
use serde_json::Value;

use scriv_core::defaults::UNKNOWN_TAG;
use scriv_core::{canonicalize_tag, SuggestedTag, TagKind};

const NO_JUSTIFICATION: &str = "No justification provided";

// =============================================================================
// TAG RESPONSES
// =============================================================================

/// Parse a raw tag response into suggestions.
///
/// Recovery ladder: slice from the first `[` to the last `]` when the array
/// opener comes before any object opener; otherwise (or when that parse
/// fails) slice from the first `{` to the last `}`, trying first a direct
/// parse and then a repair pass that comma-joins adjacent `}{` boundaries
/// and wraps the result in an array. A `{"tags": [...]}` wrapper is
/// unwrapped and a bare object becomes a one-element list. Anything still
/// unparseable yields an empty list.
///
/// Every recovered record is canonicalized; records whose tag reduces to
/// the unknown sentinel are dropped.
pub fn parse_tag_response(raw: &str) -> Vec<SuggestedTag> {
    let text = raw.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let Some(mut parsed) = extract_json_value(text) else {
        return Vec::new();
    };

    // Unwrap {"tags": [...]} despite instructions to return the array bare.
    if let Value::Object(ref map) = parsed {
        if let Some(Value::Array(tags)) = map.get("tags") {
            parsed = Value::Array(tags.clone());
        }
    }

    let items = match parsed {
        Value::Array(items) => items,
        single => vec![single],
    };

    items
        .iter()
        .map(coerce_tag)
        .filter(|t| t.tag != UNKNOWN_TAG)
        .collect()
}

/// Locate and parse the JSON payload inside free-form model text.
fn extract_json_value(text: &str) -> Option<Value> {
    let first_bracket = text.find('[');
    let first_brace = text.find('{');

    // Array slice first when the opener precedes any object opener.
    if let Some(start) = first_bracket {
        if first_brace.map_or(true, |brace| start < brace) {
            if let Some(end) = text.rfind(']') {
                if end > start {
                    if let Ok(value) = serde_json::from_str(&text[start..=end]) {
                        return Some(value);
                    }
                }
            }
        }
    }

    // Object slice, with a repair pass for concatenated objects. Also the
    // fallback when the array slice failed to parse, which recovers a
    // complete object inside an unterminated array.
    if let Some(start) = first_brace {
        if let Some(end) = text.rfind('}') {
            if end > start {
                let slice = &text[start..=end];
                if let Ok(value) = serde_json::from_str(slice) {
                    return Some(value);
                }
                if let Some(value) = repair_concatenated(slice) {
                    return Some(value);
                }
            }
        }
    }

    None
}

/// Repair `{...} {...}` sequences by comma-joining and wrapping in an array.
fn repair_concatenated(slice: &str) -> Option<Value> {
    let boundary = Regex::new(r"\}\s*\{").unwrap();
    let repaired = format!("[{}]", boundary.replace_all(slice, "},{"));
    serde_json::from_str(&repaired).ok()
}

/// Coerce one parsed record into a suggestion, tolerating missing or
/// mistyped fields. A record is `existing` only when its `type` field is
/// exactly that string.
fn coerce_tag(value: &Value) -> SuggestedTag {
    let raw_tag = match value.get("tag") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let kind = match value.get("type") {
        Some(Value::String(s)) if s == "existing" => TagKind::Existing,
        _ => TagKind::New,
    };

    let justification = match value.get("justification") {
        Some(Value::String(s)) => s.clone(),
        _ => NO_JUSTIFICATION.to_string(),
    };

    SuggestedTag::new(canonicalize_tag(&raw_tag), kind, justification)
}

// =============================================================================
// TEXT RESPONSES
// =============================================================================

/// Clean up a correction response, falling back to `original` when the
/// cleanup leaves nothing.
///
/// Strips everything through the first colon (models prefix "Here is the
/// corrected text:" despite instructions), then removes one pair of
/// wrapping quotes unless the original text itself started with a quote.
pub fn normalize_correction(raw: &str, original: &str) -> String {
    let mut text = raw.trim();

    if let Some(idx) = text.find(':') {
        text = &text[idx + 1..];
    }
    let mut text = text.trim();

    if text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !original.trim().starts_with('"')
    {
        text = &text[1..text.len() - 1];
    }

    if text.is_empty() {
        original.to_string()
    } else {
        text.to_string()
    }
}

/// Clean up a summary response. Whitespace-only output yields empty text.
pub fn normalize_summary(raw: &str) -> String {
    raw.trim().to_string()
}
