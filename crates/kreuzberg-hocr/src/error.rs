//! Error types for hOCR parsing.
//!
//! All fallible operations return [`HocrError`]:
//!
//! - `Io` - missing or unreadable files, failed reads (always bubble up unchanged)
//! - `Parsing` - markup that cannot be decoded as XML/HTML
//! - `Validation` - unsupported input shapes and invalid configuration
//!
//! Missing or malformed `bbox` / `x_wconf` values inside a word's `title` are not
//! errors. They default to zero, see [`crate::title`].
use thiserror::Error;

/// Result type alias using `HocrError`.
pub type Result<T> = std::result::Result<T, HocrError>;

/// Error type for all hOCR parsing operations.
#[derive(Debug, Error)]
pub enum HocrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HocrError {
    /// Create a Parsing error
    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parsing error with source
    pub fn parsing_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Parsing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source
    pub fn validation_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
