//! Backend trait for note assistance operations.

use async_trait::async_trait;

use crate::error::Result;
use crate::tags::{SuggestedTag, TagIndex};

/// A language-model backend that can analyze and rewrite note text.
///
/// Implementations own their transport and model selection; callers hand in
/// plain note content and get normalized results back. Per-call prompt
/// overrides replace the default system prompt when non-empty.
#[async_trait]
pub trait NoteAssistant: Send + Sync {
    /// Suggest tags for a note.
    ///
    /// `existing_tags` maps tags already used in the vault to their usage
    /// counts and steers the model toward reuse; pass an empty index when
    /// no context is available. Suggestions come back canonicalized, with
    /// unrecoverable model output yielding an empty list rather than an
    /// error.
    async fn generate_tags(
        &self,
        content: &str,
        existing_tags: &TagIndex,
        prompt_override: Option<&str>,
    ) -> Result<Vec<SuggestedTag>>;

    /// Correct spelling and grammar, returning the cleaned text.
    ///
    /// The result preserves the note's formatting; a response that cleans
    /// down to nothing yields the original content unchanged.
    async fn correct_text(&self, content: &str, prompt_override: Option<&str>) -> Result<String>;

    /// Generate a meeting-minutes summary of the note.
    async fn generate_summary(&self, content: &str, prompt_override: Option<&str>)
        -> Result<String>;

    /// List model names available on the backend.
    ///
    /// Degrades to an empty list on any failure so callers can populate
    /// pickers without error handling.
    async fn list_models(&self) -> Vec<String>;
}
