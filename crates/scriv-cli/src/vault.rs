//! Vault scanning for existing tag usage.
//!
//! Walks a directory of markdown notes and counts every tag occurrence,
//! both frontmatter declarations and inline hashtags. Index keys are
//! `#`-prefixed lowercase, matching how tags appear in the existing-tags
//! prompt block. Aside from an unreadable root, I/O problems are logged
//! and skipped rather than failing the scan.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use scriv_core::{split_frontmatter, TagIndex};

/// Build a tag usage index from every markdown note under `dir`.
///
/// An unreadable root is an error; unreadable files or subdirectories
/// inside the vault are logged and skipped.
pub fn scan_vault(dir: &Path) -> io::Result<TagIndex> {
    let mut files = Vec::new();
    collect_entries(fs::read_dir(dir)?, &mut files);

    let mut index = TagIndex::new();
    for path in &files {
        match fs::read_to_string(path) {
            Ok(content) => index_note(&content, &mut index),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable note");
            }
        }
    }

    debug!(files = files.len(), tags = index.len(), "vault scan complete");
    Ok(index)
}

/// Recursively collect `.md` files, skipping dot-directories like
/// `.obsidian` and `.git`.
fn collect_entries(entries: fs::ReadDir, files: &mut Vec<PathBuf>) {
    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            match fs::read_dir(&path) {
                Ok(sub) => collect_entries(sub, files),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                }
            }
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
}

/// Count one note's tags into the index.
fn index_note(content: &str, index: &mut TagIndex) {
    let doc = split_frontmatter(content);

    if let Some(frontmatter) = &doc.frontmatter {
        for tag in frontmatter_tags(frontmatter) {
            *index.entry(tag).or_insert(0) += 1;
        }
    }

    for tag in inline_hashtags(&doc.body) {
        *index.entry(tag).or_insert(0) += 1;
    }
}

// =============================================================================
// FRONTMATTER TAGS
// =============================================================================

/// Collect tags declared under a `tags:` (or `tag:`) frontmatter key.
///
/// Handles inline lists (`tags: [a, b]`), comma-separated or single bare
/// values, and block lists (`- a` lines under the key). This is a line
/// scanner, not a YAML parser; anything it does not recognize is ignored.
fn frontmatter_tags(frontmatter: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut in_list = false;

    for line in frontmatter.lines() {
        let trimmed = line.trim();

        if in_list {
            if let Some(item) = trimmed.strip_prefix("- ") {
                push_tag(&mut tags, item);
                continue;
            }
            in_list = false;
        }

        let Some(value) = key_value(trimmed, "tags").or_else(|| key_value(trimmed, "tag")) else {
            continue;
        };

        if value.is_empty() {
            in_list = true;
        } else if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            for item in inner.split(',') {
                push_tag(&mut tags, item);
            }
        } else {
            for item in value.split(',') {
                push_tag(&mut tags, item);
            }
        }
    }

    tags
}

fn key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)?.strip_prefix(':').map(str::trim)
}

fn push_tag(tags: &mut Vec<String>, raw: &str) {
    let cleaned = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    let cleaned = cleaned.strip_prefix('#').unwrap_or(cleaned);
    if cleaned.is_empty() {
        return;
    }
    tags.push(format!("#{}", cleaned.to_lowercase()));
}

// =============================================================================
// INLINE HASHTAGS
// =============================================================================

/// Extract inline hashtag occurrences from markdown body text.
///
/// A hashtag is `#` followed by a letter, then letters, digits, hyphens,
/// or underscores. Markdown syntax that looks like hashtags but is not is
/// stripped first: fenced code blocks, inline code, headings, link anchors,
/// and URL fragments. Occurrences are counted, not deduplicated.
fn inline_hashtags(content: &str) -> Vec<String> {
    let without_code_blocks = remove_code_blocks(content);
    let without_inline_code = remove_inline_code(&without_code_blocks);
    let without_headings = remove_headings(&without_inline_code);
    let without_links = remove_markdown_links(&without_headings);
    let without_urls = remove_urls(&without_links);

    let hashtag_pattern = Regex::new(r"(?:^|[^a-zA-Z0-9_-])#([a-zA-Z][a-zA-Z0-9_-]*)").unwrap();

    hashtag_pattern
        .captures_iter(&without_urls)
        .filter_map(|cap| cap.get(1))
        .map(|tag| format!("#{}", tag.as_str().to_lowercase()))
        .collect()
}

/// Remove fenced code blocks.
fn remove_code_blocks(content: &str) -> String {
    let pattern = Regex::new(r"(?s)```[a-z]*\n.*?```").unwrap();
    pattern.replace_all(content, "").to_string()
}

/// Remove inline code spans.
fn remove_inline_code(content: &str) -> String {
    let pattern = Regex::new(r"`[^`]+`").unwrap();
    pattern.replace_all(content, "").to_string()
}

/// Drop heading lines. A `#` run followed by a space (or nothing) is a
/// heading; `#tag` at line start is not.
fn remove_headings(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            if !trimmed.starts_with('#') {
                return true;
            }
            let hash_count = trimmed.chars().take_while(|&c| c == '#').count();
            let after_hashes = trimmed.chars().nth(hash_count);
            !(after_hashes.is_none() || after_hashes == Some(' '))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace `[text](url)` links with their text so anchors are not
/// mistaken for hashtags.
fn remove_markdown_links(content: &str) -> String {
    let pattern = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
    pattern.replace_all(content, "$1").to_string()
}

/// Remove bare URLs so fragments are not mistaken for hashtags.
fn remove_urls(content: &str) -> String {
    let pattern = Regex::new(
        r"https?://[^\s<>\[\]()]+|www\.[^\s<>\[\]()]+|[a-zA-Z0-9.-]+\.[a-z]{2,}[^\s<>\[\]()]*",
    )
    .unwrap();
    pattern.replace_all(content, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_note(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    // =========================================================================
    // SCANNING
    // =========================================================================

    #[test]
    fn counts_inline_occurrences_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "Working on #rust today. More #rust later.");
        write_note(dir.path(), "b.md", "A #rust note and a #python one.");

        let index = scan_vault(dir.path()).unwrap();
        assert_eq!(index.get("#rust"), Some(&3));
        assert_eq!(index.get("#python"), Some(&1));
    }

    #[test]
    fn reads_frontmatter_inline_list() {
        let dir = tempfile::tempdir().unwrap();
        write_note(
            dir.path(),
            "note.md",
            "---\ntags: [Work, projects]\n---\nBody",
        );

        let index = scan_vault(dir.path()).unwrap();
        assert_eq!(index.get("#work"), Some(&1));
        assert_eq!(index.get("#projects"), Some(&1));
    }

    #[test]
    fn reads_frontmatter_block_list() {
        let dir = tempfile::tempdir().unwrap();
        write_note(
            dir.path(),
            "note.md",
            "---\ntitle: X\ntags:\n  - meetings\n  - \"q3\"\n---\nBody",
        );

        let index = scan_vault(dir.path()).unwrap();
        assert_eq!(index.get("#meetings"), Some(&1));
        assert_eq!(index.get("#q3"), Some(&1));
    }

    #[test]
    fn frontmatter_and_body_counts_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "note.md", "---\ntags: [work]\n---\nInline #work too");

        let index = scan_vault(dir.path()).unwrap();
        assert_eq!(index.get("#work"), Some(&2));
    }

    #[test]
    fn scans_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_note(&dir.path().join("sub"), "deep.md", "#nested");

        let index = scan_vault(dir.path()).unwrap();
        assert_eq!(index.get("#nested"), Some(&1));
    }

    #[test]
    fn skips_dot_directories_and_non_markdown() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".obsidian")).unwrap();
        write_note(&dir.path().join(".obsidian"), "cache.md", "#hidden");
        fs::write(dir.path().join("notes.txt"), "#plain").unwrap();

        let index = scan_vault(dir.path()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn empty_vault_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_vault(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-vault");
        assert!(scan_vault(&missing).is_err());
    }

    // =========================================================================
    // EXTRACTION RULES
    // =========================================================================

    #[test]
    fn ignores_code_and_headings() {
        let content = "# Heading\n```rust\n#[derive(Debug)]\n```\nUse `#include` here\nReal #tag";
        let tags = inline_hashtags(content);
        assert_eq!(tags, vec!["#tag"]);
    }

    #[test]
    fn ignores_link_anchors_and_urls() {
        let content = "See [docs](#setup) and https://example.com/#fragment plus #real";
        let tags = inline_hashtags(content);
        assert_eq!(tags, vec!["#real"]);
    }

    #[test]
    fn hashtag_at_line_start_is_not_a_heading() {
        let tags = inline_hashtags("#nospacetag\n# A heading\n#another-tag");
        assert_eq!(tags, vec!["#nospacetag", "#another-tag"]);
    }

    #[test]
    fn lowercases_extracted_tags() {
        assert_eq!(inline_hashtags("About #Rust"), vec!["#rust"]);
    }

    #[test]
    fn frontmatter_comma_separated_value() {
        let tags = frontmatter_tags("tags: alpha, beta");
        assert_eq!(tags, vec!["#alpha", "#beta"]);
    }

    #[test]
    fn frontmatter_strips_existing_hash_prefix() {
        let tags = frontmatter_tags("tags: [\"#done\"]");
        assert_eq!(tags, vec!["#done"]);
    }

    #[test]
    fn frontmatter_ignores_unrelated_keys() {
        let tags = frontmatter_tags("title: tags are great\nstatus: draft");
        assert!(tags.is_empty());
    }
}
