//! Human-readable rendering of diagnostics

use super::{Diagnostic, DiagnosticCategory, Location};
use crate::console::{Color, Console};
use crate::paths::relative_to;
use std::path::PathBuf;

/// Environment needed to render file names and line breaks
pub trait FormatDiagnosticsHost {
    /// Directory file names are shown relative to
    fn current_directory(&self) -> PathBuf;

    /// Canonical form of a file name (case folding on case-insensitive hosts)
    fn canonical_file_name(&self, file_name: &str) -> String;

    fn new_line(&self) -> &str;
}

/// Host that renders paths from the filesystem root with `\n` line breaks
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatHost;

impl FormatDiagnosticsHost for PlainFormatHost {
    fn current_directory(&self) -> PathBuf {
        PathBuf::from("/")
    }

    fn canonical_file_name(&self, file_name: &str) -> String {
        file_name.to_string()
    }

    fn new_line(&self) -> &str {
        "\n"
    }
}

/// Renders diagnostics either compactly or with a source excerpt
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticFormatter {
    console: Console,
}

impl DiagnosticFormatter {
    /// Formatter that never emits colour codes
    pub fn plain() -> Self {
        Self {
            console: Console::no_colors(),
        }
    }

    /// Formatter that colours output when stderr is a terminal
    pub fn colored() -> Self {
        Self {
            console: Console::new(),
        }
    }

    pub fn with_console(console: Console) -> Self {
        Self { console }
    }

    /// One line per diagnostic: `file(line,col): error TS1005: message`
    pub fn format(&self, diagnostics: &[Diagnostic], host: &dyn FormatDiagnosticsHost) -> String {
        let new_line = host.new_line();
        let mut output = String::new();

        for diagnostic in diagnostics {
            if let Some(file) = self.display_file_name(diagnostic, host) {
                output.push_str(&file);
                if let Some(location) = &diagnostic.location {
                    output.push_str(&format!("({},{})", location.line, location.column));
                }
                output.push_str(": ");
            }

            output.push_str(&format!(
                "{} TS{}: {}",
                diagnostic.category.as_str(),
                diagnostic.code,
                diagnostic.message
            ));
            output.push_str(new_line);
        }

        output
    }

    /// Header line followed by the offending source line and an underline
    pub fn format_with_context(
        &self,
        diagnostics: &[Diagnostic],
        host: &dyn FormatDiagnosticsHost,
    ) -> String {
        let new_line = host.new_line();
        let mut output = String::new();

        for diagnostic in diagnostics {
            if let Some(file) = self.display_file_name(diagnostic, host) {
                output.push_str(&self.console.colorize(&file, Color::Cyan));
                if let Some(location) = &diagnostic.location {
                    output.push(':');
                    output.push_str(
                        &self
                            .console
                            .colorize(&location.line.to_string(), Color::Yellow),
                    );
                    output.push(':');
                    output.push_str(
                        &self
                            .console
                            .colorize(&location.column.to_string(), Color::Yellow),
                    );
                }
                output.push_str(" - ");
            }

            output.push_str(&self.render_category(diagnostic.category));
            output.push_str(
                &self
                    .console
                    .colorize(&format!(" TS{}: ", diagnostic.code), Color::Grey),
            );
            output.push_str(&diagnostic.message);
            output.push_str(new_line);

            if diagnostic.file.is_some()
                && let Some(location) = &diagnostic.location
            {
                output.push_str(new_line);
                output.push_str(&self.render_code_frame(location, diagnostic.category, new_line));
                output.push_str(new_line);
            }
        }

        output
    }

    fn display_file_name(
        &self,
        diagnostic: &Diagnostic,
        host: &dyn FormatDiagnosticsHost,
    ) -> Option<String> {
        let file = diagnostic.file.as_ref()?;
        let relative = relative_to(file, &host.current_directory());
        Some(host.canonical_file_name(&relative))
    }

    fn render_category(&self, category: DiagnosticCategory) -> String {
        let color = category_color(category);
        self.console.colorize(category.as_str(), color)
    }

    /// The source line with its number, then `~` under the reported span
    fn render_code_frame(
        &self,
        location: &Location,
        category: DiagnosticCategory,
        new_line: &str,
    ) -> String {
        let gutter = location.line.to_string();
        let line_text = location.line_text.replace('\t', " ");

        let mut frame = String::new();
        frame.push_str(&self.console.colorize(&gutter, Color::Reverse));
        frame.push(' ');
        frame.push_str(&line_text);
        frame.push_str(new_line);

        frame.push_str(&self.console.colorize(&" ".repeat(gutter.len()), Color::Reverse));
        frame.push(' ');
        frame.push_str(&" ".repeat(location.column.saturating_sub(1)));
        let squiggle = "~".repeat(location.length.max(1));
        frame.push_str(&self.console.colorize(&squiggle, category_color(category)));
        frame.push_str(new_line);

        frame
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::plain()
    }
}

fn category_color(category: DiagnosticCategory) -> Color {
    match category {
        DiagnosticCategory::Error => Color::Red,
        DiagnosticCategory::Warning => Color::Yellow,
        DiagnosticCategory::Message => Color::Blue,
    }
}

/// Compact plain-text rendering
pub fn format_diagnostics(diagnostics: &[Diagnostic], host: &dyn FormatDiagnosticsHost) -> String {
    DiagnosticFormatter::plain().format(diagnostics, host)
}

/// Rendering with a source excerpt, coloured when stderr is a terminal
pub fn format_diagnostics_with_color_and_context(
    diagnostics: &[Diagnostic],
    host: &dyn FormatDiagnosticsHost,
) -> String {
    DiagnosticFormatter::colored().format_with_context(diagnostics, host)
}
