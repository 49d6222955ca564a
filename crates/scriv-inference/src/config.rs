//! Backend configuration system.
//!
//! Configuration for the Ollama backend can be loaded from:
//! - TOML files (default: ~/.config/scriv/config.toml)
//! - Environment variables (SCRIV_* prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use scriv_inference::config::LlmConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = LlmConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = LlmConfig::from_file(std::path::Path::new("config.toml")).expect("Failed to load");
//!
//! // Or from environment variables
//! let config = LlmConfig::from_env();
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use scriv_core::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Ollama backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model to use for all operations.
    pub model: String,
    /// Sampling temperature for tag suggestion and summarization.
    pub temperature: f32,
    /// Request timeout in seconds. `None` uses the HTTP client's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Override for the tag suggestion system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_prompt: Option<String>,
    /// Override for the spelling correction system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_prompt: Option<String>,
    /// Override for the meeting summary system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_prompt: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OLLAMA_URL.to_string(),
            model: defaults::MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            timeout_secs: None,
            tag_prompt: None,
            correction_prompt: None,
            summary_prompt: None,
        }
    }
}

impl LlmConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/scriv/config.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("scriv");
        path.push("config.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    ///
    /// This tries to load from ~/.config/scriv/config.toml first. If that
    /// file doesn't exist, it falls back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            Ok(Self::from_env())
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let content = Self::substitute_env_vars(&content);

        #[derive(Deserialize)]
        struct TomlRoot {
            llm: TomlLlmConfig,
        }

        #[derive(Deserialize)]
        struct TomlLlmConfig {
            #[serde(default)]
            base_url: Option<String>,
            #[serde(default)]
            model: Option<String>,
            #[serde(default)]
            temperature: Option<f32>,
            #[serde(default)]
            timeout_secs: Option<u64>,
            #[serde(default)]
            tag_prompt: Option<String>,
            #[serde(default)]
            correction_prompt: Option<String>,
            #[serde(default)]
            summary_prompt: Option<String>,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        let file = root.llm;
        let base = Self::default();

        let config = Self {
            base_url: file.base_url.unwrap_or(base.base_url),
            model: file.model.unwrap_or(base.model),
            temperature: file.temperature.unwrap_or(base.temperature),
            timeout_secs: file.timeout_secs,
            tag_prompt: file.tag_prompt,
            correction_prompt: file.correction_prompt,
            summary_prompt: file.summary_prompt,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            base_url: env::var("SCRIV_OLLAMA_URL").unwrap_or(base.base_url),
            model: env::var("SCRIV_MODEL").unwrap_or(base.model),
            temperature: env::var("SCRIV_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(base.temperature),
            timeout_secs: env::var("SCRIV_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            tag_prompt: None,
            correction_prompt: None,
            summary_prompt: None,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "Ollama base_url cannot be empty".to_string(),
            ));
        }

        // Basic URL validation
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "Ollama base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.model.is_empty() {
            return Err(ConfigError::Validation(
                "model cannot be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature must be between 0.0 and 1.0, got: {}",
                self.temperature
            )));
        }

        Ok(())
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert!(config.timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = LlmConfig {
            base_url: "localhost:11434".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = LlmConfig {
            model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let config = LlmConfig {
            temperature: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"mistral\"\ntemperature = 0.2\n").unwrap();

        let config = LlmConfig::from_file(&path).unwrap();
        assert_eq!(config.model, "mistral");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_from_file_reads_prompt_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[llm]\ntag_prompt = \"Suggest tags my way.\"\n",
        )
        .unwrap();

        let config = LlmConfig::from_file(&path).unwrap();
        assert_eq!(config.tag_prompt.as_deref(), Some("Suggest tags my way."));
        assert!(config.correction_prompt.is_none());
    }

    #[test]
    fn test_from_file_requires_llm_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"mistral\"\n").unwrap();

        assert!(matches!(
            LlmConfig::from_file(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_env_var_substitution_with_value() {
        let content = "base_url = \"${TEST_SCRIV_SUBST_VAR}\"";

        env::set_var("TEST_SCRIV_SUBST_VAR", "http://other:11434");
        let result = LlmConfig::substitute_env_vars(content);
        env::remove_var("TEST_SCRIV_SUBST_VAR");

        assert_eq!(result, "base_url = \"http://other:11434\"");
    }

    #[test]
    fn test_env_var_substitution_missing() {
        let content = "base_url = \"${NONEXISTENT_SCRIV_VAR_12345}\"";
        let result = LlmConfig::substitute_env_vars(content);
        assert_eq!(result, "base_url = \"${NONEXISTENT_SCRIV_VAR_12345}\"");
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = LlmConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("base_url"));
        assert!(serialized.contains("model"));
        assert!(!serialized.contains("tag_prompt"));
    }
}
