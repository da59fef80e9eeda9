//! Parser configuration.
//!
//! The defaults match Tesseract output, so most callers never need a config and can
//! use [`crate::parse`] directly. Configuration can also be loaded from TOML or JSON:
//!
//! ```toml
//! word_class = "ocrx_word"
//! tolerate_void_elements = true
//! ```
use crate::{HocrError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default class token that marks a word element.
pub const DEFAULT_WORD_CLASS: &str = "ocrx_word";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Class token identifying word elements. Matched against each
    /// whitespace-separated token of the `class` attribute.
    pub word_class: String,

    /// Allow HTML void elements such as `<meta>` or `<br>` to appear without a
    /// closing tag. When disabled they must be self-closed like any XML element.
    pub tolerate_void_elements: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            word_class: DEFAULT_WORD_CLASS.to_string(),
            tolerate_void_elements: true,
        }
    }
}

impl ParserConfig {
    /// Check the configuration before use.
    ///
    /// # Errors
    ///
    /// Returns `HocrError::Validation` if `word_class` is empty or contains whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.word_class.trim().is_empty() {
            return Err(HocrError::validation("word_class must not be empty"));
        }
        if self.word_class.chars().any(char::is_whitespace) {
            return Err(HocrError::validation(format!(
                "word_class must be a single class token, got '{}'",
                self.word_class
            )));
        }
        Ok(())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| HocrError::validation_with_source(format!("Invalid TOML configuration: {}", e), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `HocrError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&read_config_file(path.as_ref())?)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| HocrError::validation_with_source(format!("Invalid JSON configuration: {}", e), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&read_config_file(path.as_ref())?)
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        HocrError::validation_with_source(format!("Failed to read config file {}: {}", path.display(), e), e)
    })
}
