//! Scripted backend for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scriv_core::{Error, NoteAssistant, Result, SuggestedTag, TagIndex};

/// A recorded call against [`MockAssistant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GenerateTags {
        content: String,
        existing_tags: TagIndex,
    },
    CorrectText {
        content: String,
    },
    GenerateSummary {
        content: String,
    },
    ListModels,
}

/// Scripted [`NoteAssistant`] that returns configured responses and records
/// every call. Unconfigured corrections echo the input; everything else
/// defaults to empty.
#[derive(Default)]
pub struct MockAssistant {
    tags: Vec<SuggestedTag>,
    correction: Option<String>,
    summary: Option<String>,
    models: Vec<String>,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: Vec<SuggestedTag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_correction(mut self, text: impl Into<String>) -> Self {
        self.correction = Some(text.into());
        self
    }

    pub fn with_summary(mut self, text: impl Into<String>) -> Self {
        self.summary = Some(text.into());
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Make every chat operation fail with a request error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(Error::Request(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NoteAssistant for MockAssistant {
    async fn generate_tags(
        &self,
        content: &str,
        existing_tags: &TagIndex,
        _prompt_override: Option<&str>,
    ) -> Result<Vec<SuggestedTag>> {
        self.record(MockCall::GenerateTags {
            content: content.to_string(),
            existing_tags: existing_tags.clone(),
        });
        self.check_failure()?;
        Ok(self.tags.clone())
    }

    async fn correct_text(&self, content: &str, _prompt_override: Option<&str>) -> Result<String> {
        self.record(MockCall::CorrectText {
            content: content.to_string(),
        });
        self.check_failure()?;
        Ok(self
            .correction
            .clone()
            .unwrap_or_else(|| content.to_string()))
    }

    async fn generate_summary(
        &self,
        content: &str,
        _prompt_override: Option<&str>,
    ) -> Result<String> {
        self.record(MockCall::GenerateSummary {
            content: content.to_string(),
        });
        self.check_failure()?;
        Ok(self.summary.clone().unwrap_or_default())
    }

    async fn list_models(&self) -> Vec<String> {
        self.record(MockCall::ListModels);
        self.models.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriv_core::TagKind;

    #[tokio::test]
    async fn returns_configured_tags_and_records_call() {
        let mock = MockAssistant::new().with_tags(vec![SuggestedTag::new(
            "rust",
            TagKind::New,
            "Language used",
        )]);

        let mut index = TagIndex::new();
        index.insert("#rust".to_string(), 3);

        let tags = mock.generate_tags("note body", &index, None).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag, "rust");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            MockCall::GenerateTags { content, existing_tags }
                if content == "note body" && existing_tags.contains_key("#rust")
        ));
    }

    #[tokio::test]
    async fn unconfigured_correction_echoes_input() {
        let mock = MockAssistant::new();
        let result = mock.correct_text("unchanged", None).await.unwrap();
        assert_eq!(result, "unchanged");
    }

    #[tokio::test]
    async fn injected_failure_surfaces_as_error() {
        let mock = MockAssistant::new().with_failure("connection refused");
        let err = mock.generate_summary("note", None).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn list_models_never_fails() {
        let mock = MockAssistant::new()
            .with_failure("down")
            .with_models(vec!["llama3".to_string()]);
        assert_eq!(mock.list_models().await, vec!["llama3"]);
    }
}
