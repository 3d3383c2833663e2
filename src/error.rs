// src/error.rs

//! Unified error handling for the relay.

use std::fmt;

use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The comic archive could not be reached or returned garbage
    #[error("Archive error for {context}: {message}")]
    Archive { context: String, message: String },

    /// A chat message could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),

    /// The visited-set file is unreadable or malformed
    #[error("Store error: {0}")]
    Store(String),

    /// No unvisited comic left to pick from
    #[error("Selection error: {0}")]
    Selection(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an archive error with context.
    pub fn archive(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Archive {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notification(message: impl fmt::Display) -> Self {
        Self::Notification(message.to_string())
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Create a selection error.
    pub fn selection(message: impl Into<String>) -> Self {
        Self::Selection(message.into())
    }

    /// Whether this error came from the archive.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive { .. })
    }
}
