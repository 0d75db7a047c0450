//! Unified error handling for the Notebook library
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! distinguishes recoverable storage failures (which the repository absorbs by
//! falling back to local storage) from the conditions a caller must see.

use std::io;
use thiserror::Error;

/// The main error type for the Notebook library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotebookError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport to the remote document store failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote document store rejected a request or returned unusable data
    #[error("Remote store error ({status}): {message}")]
    Remote {
        /// HTTP status code, or 0 when the failure was not status-related
        status: u16,
        /// Response body or decode failure description
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Note not found in the active store
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Note id is empty or contains path-special characters
    #[error("Invalid note ID: {0}")]
    InvalidNoteId(String),

    /// Email address rejected at login
    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    /// Note fields rejected before any storage call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// What was being attempted
        message: String,
        /// Underlying failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl NotebookError {
    /// Create a remote error from a status code and message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid note id error
    pub fn invalid_note_id(id: &str) -> Self {
        Self::InvalidNoteId(id.to_string())
    }

    /// Whether this error was raised by input validation rather than storage
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidNoteId(_) | Self::InvalidEmail(_)
        )
    }
}

/// Result type alias for Notebook operations
pub type Result<T> = std::result::Result<T, NotebookError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| NotebookError::Context {
            message: msg.into(),
            source: Box::new(e),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| NotebookError::Context {
            message: f().into(),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let err: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let err_with_context = err.context("Failed to read notes_a@b.c");

        let msg = err_with_context.unwrap_err().to_string();
        assert!(msg.contains("Failed to read notes_a@b.c"));
    }

    #[test]
    fn test_context_keeps_source() {
        use std::error::Error as _;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let err = NotebookError::Context {
            message: "Failed to write session".to_string(),
            source: Box::new(io_err),
        };

        assert_eq!(err.to_string(), "Failed to write session");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("permission denied"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(NotebookError::Validation("title".into()).is_validation());
        assert!(NotebookError::invalid_note_id("a.b").is_validation());
        assert!(NotebookError::InvalidEmail("x".into()).is_validation());
        assert!(!NotebookError::NoteNotFound("x".into()).is_validation());
        assert!(!NotebookError::remote(500, "boom").is_validation());
    }

    #[test]
    fn test_remote_error_display() {
        let err = NotebookError::remote(401, "Permission denied");
        assert_eq!(
            err.to_string(),
            "Remote store error (401): Permission denied"
        );
    }
}
