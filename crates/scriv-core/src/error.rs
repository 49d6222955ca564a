//! Error types for scriv backends.

use thiserror::Error;

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by note-assistance backends.
///
/// Only transport-level problems live here. Malformed model output is not an
/// error anywhere in scriv: tag parsing degrades to an empty list and the
/// text operations fall back to the original or empty text, so a model's
/// prose imperfections never fail a call.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status from the backend.
    #[error("Ollama API returned status {status}: {body}")]
    Transport { status: u16, body: String },

    /// The configured model is not available on the backend.
    #[error("Ollama Model '{0}' not found (404). Check your settings.")]
    ModelNotFound(String),

    /// Request construction or network failure.
    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}
