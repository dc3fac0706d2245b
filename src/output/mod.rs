//! Styled-text sinks for the report.
//!
//! The runner only ever talks to an [`OutputProvider`]; styles are hints a provider may ignore.

mod console;
mod recording;

use std::fmt;

pub use console::ConsoleOutputProvider;
pub use recording::{OutputEvent, RecordingOutputProvider};

/// Visual role of the text that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    Neutral,
    Pass,
    Fail,
    /// Section labels such as `Stacktrace:`
    BadLabel,
    ExceptionMessage,
    ExceptionStacktrace,
}

/// Receives report text. Style calls change the style of subsequent output until reset.
pub trait OutputProvider {
    /// Writes text followed by a newline.
    fn output_line(&mut self, args: fmt::Arguments<'_>);

    /// Writes text without a newline.
    fn output(&mut self, text: &str);

    fn set_style(&mut self, style: Style);

    fn blank_line(&mut self) {
        self.output_line(format_args!(""));
    }

    fn set_style_pass(&mut self) {
        self.set_style(Style::Pass);
    }

    fn set_style_fail(&mut self) {
        self.set_style(Style::Fail);
    }

    fn set_style_bad_label(&mut self) {
        self.set_style(Style::BadLabel);
    }

    fn set_style_exception_message(&mut self) {
        self.set_style(Style::ExceptionMessage);
    }

    fn set_style_exception_stacktrace(&mut self) {
        self.set_style(Style::ExceptionStacktrace);
    }

    fn reset_style(&mut self) {
        self.set_style(Style::Neutral);
    }
}

impl<O: OutputProvider + ?Sized> OutputProvider for &mut O {
    fn output_line(&mut self, args: fmt::Arguments<'_>) {
        (**self).output_line(args);
    }

    fn output(&mut self, text: &str) {
        (**self).output(text);
    }

    fn set_style(&mut self, style: Style) {
        (**self).set_style(style);
    }
}
