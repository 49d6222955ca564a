//! Centralized default constants for scriv.
//!
//! **This module is the single source of truth** for all shared default
//! values. The other crates reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// OLLAMA
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model name.
pub const MODEL: &str = "llama3";

/// Default sampling temperature for tag suggestion and summarization.
/// Correction requests omit temperature entirely.
pub const TEMPERATURE: f32 = 0.7;

/// Elapsed-time threshold above which a completed request is logged at WARN.
pub const SLOW_REQUEST_MS: u128 = 30_000;

// =============================================================================
// PROMPTS
// =============================================================================

/// Maximum number of existing tags rendered into the tag-suggestion prompt.
pub const EXISTING_TAGS_LIMIT: usize = 50;

/// Maximum characters of note content included in the tag-suggestion prompt.
pub const PROMPT_CONTENT_LIMIT: usize = 5000;

// =============================================================================
// TAGS
// =============================================================================

/// Sentinel produced when canonicalization yields an empty tag.
/// Suggestions carrying this sentinel are filtered out, never surfaced.
pub const UNKNOWN_TAG: &str = "unknown";

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Heading under which generated meeting minutes are spliced into a note.
pub const SUMMARY_HEADING: &str = "## Meeting Minutes Summary";
