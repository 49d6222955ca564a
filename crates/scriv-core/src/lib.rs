//! # scriv-core
//!
//! Core types and text utilities for Scriv, an LLM-assisted note companion.
//!
//! This crate defines the domain vocabulary shared by every backend and
//! frontend: tag suggestions and their canonical form, frontmatter-aware
//! note splitting and section insertion, the [`NoteAssistant`] backend
//! trait, and the error type for backend failures. It contains no
//! transport code.

pub mod defaults;
pub mod document;
pub mod error;
pub mod tags;
pub mod traits;

// Re-export commonly used types
pub use document::{insert_section, split_frontmatter, NoteDocument};
pub use error::{Error, Result};
pub use tags::{canonicalize_tag, merge_tags, SuggestedTag, TagIndex, TagKind};
pub use traits::NoteAssistant;
