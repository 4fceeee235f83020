//! Error taxonomy for a processing session
//!
//! Each error kind has its own user-facing rendering:
//! - validation errors are shown as-is
//! - processing errors collapse to one generic message (cause goes to tracing)
//! - clipboard errors are shown with the adapter's reason

use std::time::Duration;
use thiserror::Error;

/// Message shown for every processing failure, whatever the cause
pub const GENERIC_PROCESSING_MESSAGE: &str = "An error occurred while processing your request.";

/// Input rejected before any processing happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some text to process.")]
    EmptyInput,
}

/// Failure reported by a processor backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// The backend ran and reported a failure
    #[error("processor failed: {0}")]
    Backend(String),

    /// The backend did not answer in time
    #[error("processor timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with something we could not read
    #[error("invalid processor response: {0}")]
    InvalidResponse(String),

    /// The cycle ended without the processor resolving (future dropped or panicked)
    #[error("processing cycle interrupted")]
    Interrupted,
}

impl ProcessingError {
    /// What the user gets to see. The detail stays in the logs.
    pub fn user_message(&self) -> &'static str {
        GENERIC_PROCESSING_MESSAGE
    }
}

/// Failure reported by a clipboard adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, permission denied)
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read clipboard: {0}")]
    Read(String),

    #[error("failed to write clipboard: {0}")]
    Write(String),
}

impl ClipboardError {
    /// Clipboard failures are informative enough to show verbatim
    pub fn user_message(&self) -> String {
        format!("Clipboard error: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_error_hides_cause() {
        let err = ProcessingError::Backend("database on fire".to_string());
        assert_eq!(err.user_message(), GENERIC_PROCESSING_MESSAGE);
        assert!(!err.user_message().contains("database"));
    }

    #[test]
    fn test_clipboard_error_shows_reason() {
        let err = ClipboardError::Read("permission denied".to_string());
        let msg = err.user_message();
        assert!(msg.starts_with("Clipboard error:"));
        assert!(msg.contains("permission denied"));
    }
}
