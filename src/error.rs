//! Unified error handling for the protanno crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`ProtannoErrorTrait`] - Common interface implemented by the unified error
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{FetchError, ParseError, PipelineError};

/// Common trait for all protanno error types
pub trait ProtannoErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, server status)
    Network,
    /// Decoding of DAS documents, input files and reports
    Parsing,
    /// File and I/O errors
    Storage,
    /// Invalid user-supplied settings such as highlight patterns
    Config,
    /// Template rendering errors
    Render,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Storage => "storage error",
            Self::Config => "configuration error",
            Self::Render => "rendering error",
        }
    }
}

/// Unified error type for the protanno crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse-specific errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid highlight pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Template registration or rendering errors
    #[error("Template error: {0}")]
    Template(String),
}

impl ProtannoErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Io(_) => true,
            Self::Parse(_) | Self::Json(_) | Self::Pattern(_) | Self::Template(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Parse(_) | Self::Json(_) => ErrorCategory::Parsing,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Pattern(_) => ErrorCategory::Config,
            Self::Template(_) => ErrorCategory::Render,
        }
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let fetch_err = Error::Fetch(FetchError::Timeout);
        assert_eq!(fetch_err.category(), ErrorCategory::Network);

        let parse_err = Error::Parse(ParseError::SequenceNotFound);
        assert_eq!(parse_err.category(), ErrorCategory::Parsing);
    }

    #[test]
    fn test_is_recoverable() {
        let fetch_err = Error::Fetch(FetchError::Timeout);
        assert!(fetch_err.is_recoverable());

        let parse_err = Error::Parse(ParseError::SequenceNotFound);
        assert!(!parse_err.is_recoverable());
    }

    #[test]
    fn test_pattern_error_conversion() {
        let unified: Error = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(unified, Error::Pattern(_)));
        assert_eq!(unified.category(), ErrorCategory::Config);
        assert!(!unified.is_recoverable());
    }

    #[test]
    fn test_io_error_is_storage() {
        let unified: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(unified.category(), ErrorCategory::Storage);
        assert_eq!(unified.to_string(), "I/O error: gone");
    }
}
