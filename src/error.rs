// src/error.rs

//! Unified error handling for the tracker.

use std::fmt;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// PDF could not be read
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Word-processor archive could not be opened
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Word-processor XML could not be parsed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Downloaded document is unreadable for another reason
    #[error("Document error ({kind}): {message}")]
    Document { kind: String, message: String },

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a non-success status error.
    pub fn status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Status {
            url: url.into(),
            status: status.as_u16(),
        }
    }

    /// Create a document parsing error.
    pub fn document(kind: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Document {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error must stop the process before any network activity.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Validation(_))
    }
}
