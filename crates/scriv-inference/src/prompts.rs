//! Prompt construction for note-assistance operations.
//!
//! Default system prompts, the few-shot tagging example, and the builders
//! that turn note content plus optional overrides into chat conversations.
//! An override replaces the default system prompt only when non-empty; the
//! existing-tags context block is appended to whichever prompt is active.

use serde::Serialize;

use scriv_core::defaults::{EXISTING_TAGS_LIMIT, PROMPT_CONTENT_LIMIT};
use scriv_core::TagIndex;

// =============================================================================
// MESSAGES
// =============================================================================

/// Chat role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// DEFAULT PROMPTS
// =============================================================================

/// Default system prompt for tag suggestion.
pub const DEFAULT_TAG_PROMPT: &str = r#"
You are an intelligent assistant that analyzes notes to suggest metadata.
Generate a comprehensive list of at least 10 relevant tags for the provided Note Content.
Include general themes, specific entities, and context.
You MUST return the result as a JSON ARRAY of objects.
Start your response with `[`.
Do NOT output any conversational text.
Do NOT wrap the result in an object (like {"tags": [...]}). Return the array directly: [...].
Do NOT output markdown formatting (like ```json).
Just the raw JSON array.

IMPORTANT: Detect the language of the note content. Generate tags in the SAME language as the note content, unless the tag is a technical term standardly used in English.
The "justification" field MUST be in the SAME language as the note content.

Each object must have:
- "tag": The tag name (lowercase, no spaces, kebab-case).
- "type": Either "existing" (if it matches a provided tag) or "new".
- "justification": A short explanation (max 10 words) of why this tag is relevant.

Example output:
[
  { "tag": "productivity", "type": "existing", "justification": "Related to work efficiency" },
  { "tag": "javascript", "type": "new", "justification": "Code snippet found" }
]
"#;

/// Default system prompt for spelling and grammar correction.
pub const DEFAULT_CORRECTION_PROMPT: &str = r#"
You are a helpful assistant that corrects spelling and grammar.
Read the following text and correct any spelling or grammatical errors.
CRITICAL INSTRUCTION: Return ONLY the corrected text.
Do NOT change the meaning of the text.
Do NOT add any conversational text (like "Here is the corrected text").
Do NOT add quotes around the output unless they were in the original text.
"#;

/// Default system prompt for meeting minutes summarization.
pub const DEFAULT_SUMMARY_PROMPT: &str = r#"
You are an expert meeting secretary.
Your task is to generate a succinct meeting minutes summary from the provided note content.
STRICT INSTRUCTIONS:
1.  **Language**: The summary MUST be in the SAME LANGUAGE as the note content.
2.  **No Hallucinations**: Do NOT invent any facts. Stick STRICTLY to the provided content.
3.  **Format**:
    *   **Date**: (If found)
    *   **Attendees**: (If found)
    *   **Key Topics**: (List the main concepts)
    *   **Decisions/Action Items**: (If any)
4.  **No Tags**: Do NOT include hashtags.
5.  **Conciseness**: Keep it brief and to the point.
6.  Do NOT add conversational filler (like "Here is the summary"). Just the summary.
"#;

// =============================================================================
// FEW-SHOT EXAMPLE
// =============================================================================

/// Note used for the few-shot tagging turn. Anchors the model to realistic
/// meeting-note structure before it sees the real content.
const TAG_EXAMPLE_NOTE: &str = r#"# Meeting Minutes: Project Alpha
Date: 2023-10-27
Attendees: John, Sarah, Mike

## Agenda
1. Budget review
2. Timeline delays
3. Marketing strategy

## Discussion
- The budget is tight for Q4. We need to cut costs in the cloud infrastructure.
- Deployment to AWS is delayed by 2 weeks due to testing failures.
- Sarah proposed a new social media campaign on LinkedIn."#;

/// Assistant reply paired with [`TAG_EXAMPLE_NOTE`], demonstrating the
/// expected output shape.
const TAG_EXAMPLE_RESPONSE: &str = r#"[
  { "tag": "project-alpha", "type": "new", "justification": "Project name identified" },
  { "tag": "meeting-minutes", "type": "new", "justification": "Note type inferred" },
  { "tag": "budget", "type": "existing", "justification": "Key topic discussed" },
  { "tag": "finance", "type": "existing", "justification": "Related to budget discussion" },
  { "tag": "aws", "type": "new", "justification": "Specific cloud provider mentioned" },
  { "tag": "infrastructure", "type": "existing", "justification": "Context of cost cutting" },
  { "tag": "marketing", "type": "existing", "justification": "Strategy topic discussed" },
  { "tag": "social-media", "type": "new", "justification": "Campaign channel proposed" },
  { "tag": "linkedin", "type": "new", "justification": "Specific platform entity" },
  { "tag": "deployment", "type": "existing", "justification": "Process regarding delays" },
  { "tag": "testing", "type": "existing", "justification": "Cause of delay identified" },
  { "tag": "planning", "type": "existing", "justification": "General meeting context" }
]"#;

// =============================================================================
// BUILDERS
// =============================================================================

/// Build the conversation for tag suggestion.
///
/// Four messages: system prompt (default or override, each with the
/// existing-tags block appended when the index is non-empty), the few-shot
/// example request and reply, and the real request with content truncated
/// to the prompt limit.
pub fn tag_suggestion_messages(
    content: &str,
    existing_tags: &TagIndex,
    prompt_override: Option<&str>,
) -> Vec<ChatMessage> {
    let mut system = prompt_override
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_TAG_PROMPT)
        .to_string();

    if !existing_tags.is_empty() {
        system.push_str(&existing_tags_block(existing_tags));
    }

    vec![
        ChatMessage::system(system),
        ChatMessage::user(tag_request_message(TAG_EXAMPLE_NOTE)),
        ChatMessage::assistant(TAG_EXAMPLE_RESPONSE),
        ChatMessage::user(tag_request_message(truncate_chars(
            content,
            PROMPT_CONTENT_LIMIT,
        ))),
    ]
}

/// Build the conversation for spelling correction.
pub fn correction_messages(content: &str, prompt_override: Option<&str>) -> Vec<ChatMessage> {
    let system = prompt_override
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_CORRECTION_PROMPT);

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!("Text to correct:\n{content}")),
    ]
}

/// Build the conversation for meeting minutes summarization.
pub fn summary_messages(content: &str, prompt_override: Option<&str>) -> Vec<ChatMessage> {
    let system = prompt_override
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SUMMARY_PROMPT);

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!(
            "Generate a meeting minutes summary for the following note content:\n\n{content}"
        )),
    ]
}

/// Tag analysis request wrapping the given note content. The few-shot turn
/// and the real request use the same wording.
fn tag_request_message(content: &str) -> String {
    format!(
        "Analyze the following note structure and content.\nIdentify key themes, entities, topics, and specific details.\nBrainstorm a comprehensive list of at least 10 tags.\n\nNote Content:\n{content}"
    )
}

/// Existing-tags context block, sorted by usage count descending (name
/// ascending on ties) and capped at the prompt limit.
fn existing_tags_block(existing_tags: &TagIndex) -> String {
    let mut entries: Vec<(&String, &u32)> = existing_tags.iter().collect();
    entries.sort_by(|(tag_a, count_a), (tag_b, count_b)| {
        count_b.cmp(count_a).then_with(|| tag_a.cmp(tag_b))
    });

    let lines = entries
        .iter()
        .take(EXISTING_TAGS_LIMIT)
        .map(|(tag, count)| format!("- {tag} ({count} uses)"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nHere is a list of existing tags in the vault (with usage counts).\nPRIORITIZE using these existing tags if they are relevant.\nMark as \"type\": \"existing\" if you use one of these.\n\nExisting Tags (Top 50):\n{lines}\n"
    )
}

/// Truncate to at most `limit` characters, never splitting a character.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
