//! Terminal colour helper for rendered diagnostics

use std::env;
use std::io::{self, IsTerminal};

/// Console output handler with color support
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color_enabled: bool,
}

impl Console {
    /// Create a console that colours output only when stderr is a terminal
    pub fn new() -> Self {
        Self {
            color_enabled: io::stderr().is_terminal() && env::var("NO_COLOR").is_err(),
        }
    }

    /// Create a console with colors disabled
    pub fn no_colors() -> Self {
        Self {
            color_enabled: false,
        }
    }

    /// Create a console with colors always enabled
    pub fn always_colors() -> Self {
        Self {
            color_enabled: true,
        }
    }

    /// Check if color output is enabled
    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Colorize text with the specified color
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            Color::Red => format!("\x1b[91m{text}\x1b[0m"),
            Color::Yellow => format!("\x1b[93m{text}\x1b[0m"),
            Color::Blue => format!("\x1b[94m{text}\x1b[0m"),
            Color::Cyan => format!("\x1b[96m{text}\x1b[0m"),
            Color::Grey => format!("\x1b[90m{text}\x1b[0m"),
            Color::Reverse => format!("\x1b[7m{text}\x1b[0m"),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Cyan,
    Grey,
    /// Used for the line-number gutter
    Reverse,
}
