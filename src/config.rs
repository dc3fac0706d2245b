//! Run configuration
//!
//! The launcher takes these settings as flags; a test binary started by the launcher (or
//! directly) reads them from the environment.

use std::env;
use std::fmt;

use clap::ValueEnum;

/// Color mode for the console report.
pub const COLOR_ENV: &str = "TESTCRAFT_COLOR";
/// Number of spaces per indentation level.
pub const INDENT_ENV: &str = "TESTCRAFT_INDENT";
/// `0`/`false` hides stack traces of failures.
pub const TRACES_ENV: &str = "TESTCRAFT_TRACES";

/// When to color the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when the terminal supports it
    #[default]
    Auto,
    /// Always emit colors
    Always,
    /// Never emit colors
    Never,
}

impl ColorChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorChoice::Auto => "auto",
            ColorChoice::Always => "always",
            ColorChoice::Never => "never",
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub color: ColorChoice,
    /// Spaces per namespace/fixture nesting level
    pub indent_width: usize,
    /// Print the stack trace section under failures
    pub show_traces: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            indent_width: 2,
            show_traces: true,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_show_traces(mut self, show: bool) -> Self {
        self.show_traces = show;
        self
    }

    /// Settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Settings from an arbitrary key lookup; unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(COLOR_ENV) {
            match ColorChoice::from_str(value.trim(), true) {
                Ok(color) => config.color = color,
                Err(_) => tracing::warn!(key = COLOR_ENV, value = %value, "ignoring unknown color mode"),
            }
        }
        if config.color == ColorChoice::Auto && lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.color = ColorChoice::Never;
        }

        if let Some(value) = lookup(INDENT_ENV) {
            match value.trim().parse() {
                Ok(width) => config.indent_width = width,
                Err(_) => tracing::warn!(key = INDENT_ENV, value = %value, "ignoring invalid indent width"),
            }
        }

        if let Some(value) = lookup(TRACES_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.show_traces = true,
                "0" | "false" | "no" | "off" => config.show_traces = false,
                _ => tracing::warn!(key = TRACES_ENV, value = %value, "ignoring invalid trace toggle"),
            }
        }

        config
    }
}
