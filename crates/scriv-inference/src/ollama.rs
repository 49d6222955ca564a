//! Ollama chat backend.
//!
//! Talks to a local Ollama server over its `/api/chat` and `/api/tags`
//! endpoints, always non-streaming. Raw model text goes through the
//! normalizers in [`crate::normalize`] before it reaches callers.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use scriv_core::defaults::{self, SLOW_REQUEST_MS};
use scriv_core::{Error, NoteAssistant, Result, SuggestedTag, TagIndex};

use crate::config::{ConfigResult, LlmConfig};
use crate::normalize::{normalize_correction, normalize_summary, parse_tag_response};
use crate::prompts::{correction_messages, summary_messages, tag_suggestion_messages, ChatMessage};

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    /// Older server versions put the text here instead.
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// Pull the response text out of a chat envelope, preferring the modern
/// `message.content` field and falling back to the legacy `response` field
/// when the primary is absent or blank.
fn extract_text(response: ChatResponse) -> String {
    let primary = response
        .message
        .map(|m| m.content.trim().to_string())
        .unwrap_or_default();
    if !primary.is_empty() {
        return primary;
    }
    response
        .response
        .map(|r| r.trim().to_string())
        .unwrap_or_default()
}

/// Strip one trailing slash so endpoint paths join cleanly.
fn trim_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

// =============================================================================
// CLIENT
// =============================================================================

/// Client for a single Ollama server and model.
pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: f32,
    tag_prompt: Option<String>,
    correction_prompt: Option<String>,
    summary_prompt: Option<String>,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client with default temperature and prompts.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(&base_url.into()),
            model: model.into(),
            temperature: defaults::TEMPERATURE,
            tag_prompt: None,
            correction_prompt: None,
            summary_prompt: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from a validated configuration.
    pub fn with_config(config: &LlmConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url: trim_base_url(&config.base_url),
            model: config.model.clone(),
            temperature: config.temperature,
            tag_prompt: config.tag_prompt.clone(),
            correction_prompt: config.correction_prompt.clone(),
            summary_prompt: config.summary_prompt.clone(),
            client: builder.build()?,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::with_config(&LlmConfig::from_env())
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue one non-streaming chat request and return the response text.
    ///
    /// A 404 maps to [`Error::ModelNotFound`] for the configured model;
    /// any other non-success status maps to [`Error::Transport`].
    async fn chat(&self, messages: &[ChatMessage], temperature: Option<f32>) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: temperature.map(|temperature| ChatOptions { temperature }),
        };

        let start = Instant::now();
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ModelNotFound(self.model.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = response.json().await?;
        let text = extract_text(envelope);

        let elapsed = start.elapsed();
        debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            response_bytes = text.len(),
            "chat request completed"
        );
        if elapsed.as_millis() > SLOW_REQUEST_MS {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                model = %self.model,
                "slow Ollama request"
            );
        }

        Ok(text)
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let list: ModelList = response.json().await?;
        Ok(list.models.into_iter().map(|m| m.name).collect())
    }

    /// Resolve the prompt for an operation: a non-empty per-call override
    /// wins, then the configured prompt, then the built-in default (chosen
    /// inside the builders).
    fn resolve_prompt<'a>(
        per_call: Option<&'a str>,
        configured: Option<&'a str>,
    ) -> Option<&'a str> {
        per_call.filter(|p| !p.is_empty()).or(configured)
    }
}

#[async_trait]
impl NoteAssistant for OllamaClient {
    #[instrument(skip(self, content, existing_tags, prompt_override), fields(model = %self.model))]
    async fn generate_tags(
        &self,
        content: &str,
        existing_tags: &TagIndex,
        prompt_override: Option<&str>,
    ) -> Result<Vec<SuggestedTag>> {
        let prompt = Self::resolve_prompt(prompt_override, self.tag_prompt.as_deref());
        let messages = tag_suggestion_messages(content, existing_tags, prompt);
        let text = self.chat(&messages, Some(self.temperature)).await?;

        let tags = parse_tag_response(&text);
        if tags.is_empty() && !text.is_empty() {
            warn!("no tag suggestions recovered from model output");
        } else {
            debug!(count = tags.len(), "parsed tag suggestions");
        }
        Ok(tags)
    }

    #[instrument(skip(self, content, prompt_override), fields(model = %self.model))]
    async fn correct_text(&self, content: &str, prompt_override: Option<&str>) -> Result<String> {
        let prompt = Self::resolve_prompt(prompt_override, self.correction_prompt.as_deref());
        let messages = correction_messages(content, prompt);
        // Corrections run at the server's default sampling settings.
        let text = self.chat(&messages, None).await?;
        if text.is_empty() {
            warn!("empty correction response, returning original text");
        }
        Ok(normalize_correction(&text, content))
    }

    #[instrument(skip(self, content, prompt_override), fields(model = %self.model))]
    async fn generate_summary(
        &self,
        content: &str,
        prompt_override: Option<&str>,
    ) -> Result<String> {
        let prompt = Self::resolve_prompt(prompt_override, self.summary_prompt.as_deref());
        let messages = summary_messages(content, prompt);
        let text = self.chat(&messages, Some(self.temperature)).await?;
        let summary = normalize_summary(&text);
        if summary.is_empty() {
            warn!("summary generation produced no text");
        }
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(err) => {
                warn!(error = %err, "model listing failed, returning empty list");
                Vec::new()
            }
        }
    }
}
