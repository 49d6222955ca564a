//! Frontmatter-aware note splitting and section insertion.
//!
//! Notes may open with a metadata block delimited by `---` lines. Generated
//! sections must land after that block, never inside it, and the block itself
//! must survive byte-for-byte. Everything here is plain text splicing; no
//! frontmatter keys are interpreted.

// =============================================================================
// DOCUMENT
// =============================================================================

/// A note split into its frontmatter content and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDocument {
    /// Text between the `---` delimiter lines, without the delimiters.
    /// `None` when the note does not start with a complete block.
    pub frontmatter: Option<String>,
    /// Everything after the closing delimiter line, or the whole note when
    /// no frontmatter was recognized.
    pub body: String,
}

/// Byte length of the frontmatter block at the start of `text`, delimiters
/// included. `None` unless the text begins with `---\n` and a closing
/// `\n---\n` follows.
fn frontmatter_len(text: &str) -> Option<usize> {
    let inner = text.strip_prefix("---\n")?;
    let end = inner.find("\n---\n")?;
    Some(4 + end + 5)
}

/// Split a note into frontmatter and body.
///
/// Recognition is strict: the block must start at the first byte and be
/// closed by a `---` line with a trailing newline. Leading whitespace or an
/// unterminated block leaves the whole text in `body`.
pub fn split_frontmatter(text: &str) -> NoteDocument {
    match frontmatter_len(text) {
        Some(len) => NoteDocument {
            frontmatter: Some(text[4..len - 5].to_string()),
            body: text[len..].to_string(),
        },
        None => NoteDocument {
            frontmatter: None,
            body: text.to_string(),
        },
    }
}

// =============================================================================
// SECTION INSERTION
// =============================================================================

/// Insert a generated section under `heading` at the top of a note.
///
/// Frontmatter detection runs on the trimmed note, so surrounding whitespace
/// does not hide a block, but the returned text always splices the original
/// untrimmed note. With frontmatter the section goes right after the closing
/// delimiter, separated from it by a blank line. Without frontmatter the
/// section is prepended above the content, and an empty note becomes just
/// the heading and section.
///
/// # Examples
///
/// ```
/// use scriv_core::insert_section;
///
/// assert_eq!(insert_section("", "BODY", "H"), "H\nBODY");
/// assert_eq!(
///     insert_section("# Title", "BODY", "H"),
///     "H\nBODY\n\n# Title"
/// );
/// ```
pub fn insert_section(original: &str, section_body: &str, heading: &str) -> String {
    let trimmed = original.trim();
    if let Some(len) = frontmatter_len(trimmed) {
        // The block starts after any leading whitespace of the untrimmed
        // note; splice there so the original bytes around it are kept.
        let start = original.len() - original.trim_start().len();
        let split = start + len;
        format!(
            "{}\n{heading}\n{section_body}\n{}",
            &original[..split],
            &original[split..]
        )
    } else if !trimmed.is_empty() {
        format!("{heading}\n{section_body}\n\n{original}")
    } else {
        format!("{heading}\n{section_body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::SUMMARY_HEADING;

    // =========================================================================
    // SPLITTING
    // =========================================================================

    #[test]
    fn split_extracts_frontmatter_and_body() {
        let doc = split_frontmatter("---\ntags: [a]\n---\n# Title");
        assert_eq!(doc.frontmatter.as_deref(), Some("tags: [a]"));
        assert_eq!(doc.body, "# Title");
    }

    #[test]
    fn split_handles_multi_line_frontmatter() {
        let doc = split_frontmatter("---\ntitle: X\ntags:\n  - a\n  - b\n---\nBody text");
        assert_eq!(
            doc.frontmatter.as_deref(),
            Some("title: X\ntags:\n  - a\n  - b")
        );
        assert_eq!(doc.body, "Body text");
    }

    #[test]
    fn split_without_frontmatter_keeps_whole_body() {
        let doc = split_frontmatter("# Title\nSome content");
        assert_eq!(doc.frontmatter, None);
        assert_eq!(doc.body, "# Title\nSome content");
    }

    #[test]
    fn split_rejects_unterminated_block() {
        let doc = split_frontmatter("---\ntags: [a]\n# Title");
        assert_eq!(doc.frontmatter, None);
        assert_eq!(doc.body, "---\ntags: [a]\n# Title");
    }

    #[test]
    fn split_requires_block_at_first_byte() {
        let doc = split_frontmatter("\n---\na: 1\n---\nX");
        assert_eq!(doc.frontmatter, None);
    }

    #[test]
    fn split_accepts_empty_frontmatter_content() {
        let doc = split_frontmatter("---\n\n---\nrest");
        assert_eq!(doc.frontmatter.as_deref(), Some(""));
        assert_eq!(doc.body, "rest");
    }

    // =========================================================================
    // INSERTION
    // =========================================================================

    #[test]
    fn insert_into_empty_note() {
        assert_eq!(insert_section("", "BODY", "H"), "H\nBODY");
    }

    #[test]
    fn insert_into_whitespace_only_note() {
        assert_eq!(insert_section("   \n  ", "BODY", "H"), "H\nBODY");
    }

    #[test]
    fn insert_prepends_without_frontmatter() {
        assert_eq!(
            insert_section("# Title\nSome content", "BODY", "H"),
            "H\nBODY\n\n# Title\nSome content"
        );
    }

    #[test]
    fn insert_after_frontmatter_block() {
        assert_eq!(
            insert_section("---\ntags: [a]\n---\n# Title", "BODY", "H"),
            "---\ntags: [a]\n---\n\nH\nBODY\n# Title"
        );
    }

    #[test]
    fn insert_preserves_leading_whitespace_before_block() {
        assert_eq!(
            insert_section("\n---\na: 1\n---\nX", "BODY", "H"),
            "\n---\na: 1\n---\n\nH\nBODY\nX"
        );
    }

    #[test]
    fn insert_treats_back_to_back_delimiters_as_content() {
        // "---\n---\n" has no body line between the delimiters, so it is not
        // a frontmatter block.
        assert_eq!(
            insert_section("---\n---\nX", "BODY", "H"),
            "H\nBODY\n\n---\n---\nX"
        );
    }

    #[test]
    fn insert_prepends_when_block_has_no_trailing_content() {
        // Trimming drops the newline after the closing delimiter, so the
        // block no longer matches and the note is treated as plain content.
        assert_eq!(
            insert_section("---\na: 1\n---\n", "BODY", "H"),
            "H\nBODY\n\n---\na: 1\n---\n"
        );
    }

    #[test]
    fn insert_meeting_minutes_after_frontmatter() {
        let minutes = "# Meeting Minutes\n- Point 1";
        let result = insert_section("---\ntags: [a]\n---\n# Title", minutes, SUMMARY_HEADING);
        assert_eq!(
            result,
            format!("---\ntags: [a]\n---\n\n{SUMMARY_HEADING}\n{minutes}\n# Title")
        );
    }

    #[test]
    fn insert_keeps_complex_frontmatter_verbatim() {
        let original = "---\ntitle: Weekly Sync\ntags:\n  - meetings\n  - q3\n---\n\n## Agenda\n- item";
        let result = insert_section(original, "BODY", "H");
        assert!(result.starts_with("---\ntitle: Weekly Sync\ntags:\n  - meetings\n  - q3\n---\n"));
        assert!(result.contains("\nH\nBODY\n"));
        assert!(result.ends_with("\n## Agenda\n- item"));
    }
}
