//! Error handling for the Notebook CLI
//!
//! Library errors are carried with their source chain intact and mapped to
//! an exit code: input validation failures exit with 2, everything else
//! with 1.

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use notebook::NotebookError;
use std::error::Error;
use std::fmt;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a CLI error from another error with a specific exit code
    pub fn from_error<E: Error + Send + Sync + 'static>(error: E, exit_code: i32) -> Self {
        Self {
            message: error.to_string(),
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// Create a CLI error with exit code 1 (general error)
    pub fn general<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_WARNING)
    }

    /// Create a CLI error with exit code 2 (validation error)
    pub fn validation<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_ERROR)
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        // The wrapped error's own message is already the headline
        let mut current_source = match self.source() {
            Some(err) if err.to_string() == self.message => err.source(),
            other => other,
        };
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {}", err));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<NotebookError> for CliError {
    fn from(error: NotebookError) -> Self {
        if error.is_validation() {
            Self::validation(error)
        } else {
            Self::general(error)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::general(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::general(error)
    }
}

/// Convert a CliResult to an exit code, printing the full error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notebook::ErrorContext;

    #[test]
    fn test_validation_errors_exit_2() {
        let error: CliError = NotebookError::Validation("empty title".into()).into();
        assert_eq!(error.exit_code, EXIT_ERROR);

        let error: CliError = NotebookError::InvalidEmail("nope".into()).into();
        assert_eq!(error.exit_code, EXIT_ERROR);
    }

    #[test]
    fn test_storage_errors_exit_1() {
        let error: CliError = NotebookError::NoteNotFound("abc".into()).into();
        assert_eq!(error.exit_code, EXIT_WARNING);
        assert_eq!(error.full_chain(), "Note not found: abc");
    }

    #[test]
    fn test_full_chain_includes_causes() {
        let io_error: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        let error: CliError = io_error
            .context("Failed to save notes")
            .unwrap_err()
            .into();

        let chain = error.full_chain();
        assert!(chain.starts_with("Failed to save notes"));
        assert!(chain.contains("Caused by: access denied"));
        assert_eq!(chain.matches("Failed to save notes").count(), 1);
    }

    #[test]
    fn test_handle_cli_result() {
        assert_eq!(handle_cli_result(Ok::<(), CliError>(())), EXIT_SUCCESS);
        assert_eq!(
            handle_cli_result::<()>(Err(CliError::new("boom", EXIT_WARNING))),
            EXIT_WARNING
        );
    }
}
