//! # scriv-inference
//!
//! Ollama-backed implementation of the scriv note assistant.
//!
//! The [`OllamaClient`] speaks the non-streaming chat protocol of a local
//! Ollama server and implements [`scriv_core::NoteAssistant`]. Prompt
//! construction lives in [`prompts`], recovery of structured results from
//! messy model output in [`normalize`], and file/env configuration in
//! [`config`]. A scripted mock backend is available to downstream tests
//! behind the `mock` feature.

pub mod config;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod normalize;
pub mod ollama;
pub mod prompts;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, LlmConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockAssistant, MockCall};
pub use ollama::OllamaClient;
