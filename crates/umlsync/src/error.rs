//! Error types for umlsync operations.
//!
//! This module provides the main error type [`UmlSyncError`] which wraps the
//! error conditions of a run: reading the class source, loading the diagram
//! and saving it back.

use std::io;

use thiserror::Error;

use umlsync_parser::ParseError;

use crate::document::{DocumentError, FormatError};

/// The main error type for umlsync operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the class source next to the diagnostics so
/// that their spans can be rendered against it.
#[derive(Debug, Error)]
pub enum UmlSyncError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("invalid diagram: {0}")]
    Format(#[from] FormatError),

    #[error("failed to replace diagram file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl From<DocumentError> for UmlSyncError {
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::Io(err) => Self::Io(err),
            DocumentError::Format(err) => Self::Format(err),
            DocumentError::Persist(err) => Self::Persist(err),
        }
    }
}

impl UmlSyncError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
