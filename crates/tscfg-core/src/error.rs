//! Error types for loading tsconfig files

use crate::diagnostics::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of every error raised while converting a parsed config into options
pub const RESOLUTION_ERROR_PREFIX: &str =
    "Error while parsing tsconfig and converting to compiler options";

/// Main error type for config loading
#[derive(Debug, Error)]
pub enum TsConfigError {
    /// The config file itself could not be read
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config (or a file in its `extends` chain) could not be parsed.
    ///
    /// `message` is the diagnostic already formatted for display.
    #[error("{message}")]
    DiagnosticError {
        message: String,
        diagnostic: Box<Diagnostic>,
    },

    /// Converting the parsed config into compiler options failed
    #[error("{}\n{message}", RESOLUTION_ERROR_PREFIX)]
    ResolutionError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Diagnostic,
    Resolution,
}

impl TsConfigError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TsConfigError::IoError { .. } => ErrorKind::Io,
            TsConfigError::DiagnosticError { .. } => ErrorKind::Diagnostic,
            TsConfigError::ResolutionError { .. } => ErrorKind::Resolution,
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a diagnostic error from a diagnostic and its rendered form
    pub fn diagnostic_error(message: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self::DiagnosticError {
            message: message.into(),
            diagnostic: Box::new(diagnostic),
        }
    }

    /// Create a resolution error
    pub fn resolution_error(message: impl Into<String>) -> Self {
        Self::ResolutionError {
            message: message.into(),
        }
    }

    /// The underlying diagnostic, for parse-stage failures
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            TsConfigError::DiagnosticError { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}
