//! Diagnostics produced while reading and resolving config files
//!
//! A [`Diagnostic`] carries a numeric code, a message and, when the problem
//! can be pinned to a place in a file, a [`Location`]. Fatal diagnostics are
//! rendered with [`DiagnosticFormatter`] and returned as errors; soft ones are
//! collected on the parsed config and logged.

mod formatter;
pub mod messages;

pub use formatter::{
    DiagnosticFormatter, FormatDiagnosticsHost, PlainFormatHost, format_diagnostics,
    format_diagnostics_with_color_and_context,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Diagnostic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

impl DiagnosticCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        }
    }
}

/// Position of a diagnostic inside a file (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub length: usize,
    /// Text of the offending line, kept for context rendering
    #[serde(skip)]
    pub line_text: String,
}

impl Location {
    /// Build a location from a 1-based line/column pair
    pub fn from_line_column(source: &str, line: usize, column: usize, length: usize) -> Self {
        let line_text = source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or_default()
            .to_string();

        Self {
            line,
            column,
            length,
            line_text,
        }
    }

    /// Build a location from a byte offset into `source`
    pub fn from_offset(source: &str, offset: usize, length: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;

        Self::from_line_column(source, line, column, length)
    }
}

/// A structured description of a parse or validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create an error diagnostic without a file
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            category: DiagnosticCategory::Error,
            message: message.into(),
            file: None,
            location: None,
        }
    }

    /// Attach the file the diagnostic refers to
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach a position in the file
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Point the diagnostic at the first occurrence of `literal` as a JSON
    /// string in `source`. Leaves the location unset when it is not found.
    pub fn at_string_literal(mut self, source: &str, literal: &str) -> Self {
        let quoted = format!("\"{literal}\"");
        if let Some(offset) = source.find(&quoted) {
            self.location = Some(Location::from_offset(
                source,
                offset,
                quoted.chars().count(),
            ));
        }
        self
    }

    /// File name as recorded on the diagnostic
    pub fn file_name(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}
