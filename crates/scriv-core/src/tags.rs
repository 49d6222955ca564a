//! Tag suggestion types and canonicalization.
//!
//! Model output names tags in whatever shape the model felt like producing;
//! everything user-facing goes through [`canonicalize_tag`] first so the rest
//! of the system only ever sees lowercase, hyphenated, hash-stripped slugs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::UNKNOWN_TAG;

// =============================================================================
// TAG INDEX
// =============================================================================

/// Usage counts of tags already present in a vault, keyed by the tag name as
/// it appears there (typically `#`-prefixed).
///
/// Supplied by the caller per operation and never mutated by the library.
/// An empty index is equivalent to supplying none.
pub type TagIndex = HashMap<String, u32>;

// =============================================================================
// SUGGESTED TAGS
// =============================================================================

/// Whether a suggested tag reuses one the vault already has.
///
/// This mirrors the model's own claim: a suggestion is `Existing` only when
/// the model's `type` field is exactly `"existing"`; anything else is `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Matches a tag from the provided existing-tag context.
    Existing,
    /// Not previously used in the vault.
    New,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::New => "new",
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single tag suggestion recovered from model output.
///
/// Invariant: `tag` is canonical (see [`canonicalize_tag`]) and non-empty;
/// the normalizer discards any record whose canonical tag is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTag {
    /// Canonical tag slug.
    pub tag: String,
    /// Whether the model claims to reuse an existing vault tag.
    #[serde(rename = "type")]
    pub kind: TagKind,
    /// Short model-supplied rationale for the suggestion.
    pub justification: String,
}

impl SuggestedTag {
    pub fn new(tag: impl Into<String>, kind: TagKind, justification: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind,
            justification: justification.into(),
        }
    }
}

// =============================================================================
// CANONICALIZATION
// =============================================================================

/// Canonicalize a free-form tag string into slug form.
///
/// Steps, in order: lowercase, collapse whitespace runs into single hyphens,
/// strip one leading `#`. An input that reduces to nothing yields the
/// [`UNKNOWN_TAG`] sentinel, which callers filter out.
///
/// # Examples
///
/// ```
/// use scriv_core::canonicalize_tag;
///
/// assert_eq!(canonicalize_tag("  Hello World  "), "hello-world");
/// assert_eq!(canonicalize_tag("#Foo"), "foo");
/// assert_eq!(canonicalize_tag(""), "unknown");
/// ```
pub fn canonicalize_tag(raw: &str) -> String {
    let slug = raw
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    let slug = slug.strip_prefix('#').unwrap_or(&slug);
    if slug.is_empty() {
        UNKNOWN_TAG.to_string()
    } else {
        slug.to_string()
    }
}

/// Merge new tags into an existing collection without re-adding duplicates.
///
/// Membership is case-sensitive over already-canonicalized strings; relative
/// order is preserved (current tags first, then additions in input order).
pub fn merge_tags(current: &[String], additions: &[String]) -> Vec<String> {
    let mut merged = current.to_vec();
    for tag in additions {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // CANONICALIZATION
    // =========================================================================

    #[test]
    fn canonicalize_lowercases_and_hyphenates() {
        assert_eq!(canonicalize_tag("  Hello World  "), "hello-world");
        assert_eq!(canonicalize_tag("Machine   Learning"), "machine-learning");
    }

    #[test]
    fn canonicalize_strips_single_leading_hash() {
        assert_eq!(canonicalize_tag("#Foo"), "foo");
        assert_eq!(canonicalize_tag("##foo"), "#foo");
    }

    #[test]
    fn canonicalize_empty_yields_unknown_sentinel() {
        assert_eq!(canonicalize_tag(""), UNKNOWN_TAG);
        assert_eq!(canonicalize_tag("   "), UNKNOWN_TAG);
        assert_eq!(canonicalize_tag("#"), UNKNOWN_TAG);
    }

    #[test]
    fn canonicalize_keeps_existing_slugs_unchanged() {
        assert_eq!(canonicalize_tag("meeting-minutes"), "meeting-minutes");
        assert_eq!(canonicalize_tag("aws"), "aws");
    }

    #[test]
    fn canonicalize_handles_unicode_content() {
        assert_eq!(canonicalize_tag("Réunion Équipe"), "réunion-équipe");
    }

    // =========================================================================
    // MERGE
    // =========================================================================

    #[test]
    fn merge_skips_tags_already_present() {
        let current = vec!["a".to_string(), "b".to_string()];
        let additions = vec!["b".to_string(), "c".to_string()];
        assert_eq!(merge_tags(&current, &additions), vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_is_case_sensitive() {
        let current = vec!["Todo".to_string()];
        let additions = vec!["todo".to_string()];
        assert_eq!(merge_tags(&current, &additions), vec!["Todo", "todo"]);
    }

    #[test]
    fn merge_preserves_addition_order() {
        let current: Vec<String> = vec![];
        let additions = vec!["z".to_string(), "a".to_string(), "z".to_string()];
        assert_eq!(merge_tags(&current, &additions), vec!["z", "a"]);
    }

    // =========================================================================
    // SERDE
    // =========================================================================

    #[test]
    fn suggested_tag_serializes_kind_as_type_field() {
        let tag = SuggestedTag::new("rust", TagKind::Existing, "Language discussed");
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["tag"], "rust");
        assert_eq!(json["type"], "existing");
        assert_eq!(json["justification"], "Language discussed");
    }

    #[test]
    fn suggested_tag_deserializes_from_wire_shape() {
        let tag: SuggestedTag =
            serde_json::from_str(r#"{"tag":"aws","type":"new","justification":"Cloud provider"}"#)
                .unwrap();
        assert_eq!(tag.tag, "aws");
        assert_eq!(tag.kind, TagKind::New);
    }

    #[test]
    fn tag_kind_display() {
        assert_eq!(TagKind::Existing.to_string(), "existing");
        assert_eq!(TagKind::New.to_string(), "new");
    }
}
