use std::fmt;
use std::io::{self, IsTerminal, Write};

use colored::Color;

use super::{OutputProvider, Style};
use crate::config::ColorChoice;

/// Writes the report to a terminal (or any writer), coloring it with ANSI escapes.
///
/// Write errors are dropped: a broken stdout must not turn into a test failure.
#[derive(Debug)]
pub struct ConsoleOutputProvider<W: Write = io::Stdout> {
    out: W,
    style: Style,
    color: bool,
}

/// SGR parameter for faint text.
const DIM: &str = "2";

impl ConsoleOutputProvider {
    /// Colors follow `choice`; `Auto` colors only when stdout is a terminal.
    pub fn stdout(choice: ColorChoice) -> Self {
        let out = io::stdout();
        let color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => out.is_terminal(),
        };
        Self::new(out, color)
    }
}

impl<W: Write> ConsoleOutputProvider<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            style: Style::Neutral,
            color,
        }
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Wraps `text` in the current style's escapes. Decided per provider, so two providers with
    /// different choices can coexist in one process.
    fn paint(&self, text: &str) -> String {
        if !self.color || text.is_empty() {
            return text.to_string();
        }
        let params = match self.style {
            Style::Neutral => return text.to_string(),
            Style::Pass => vec![Color::Green.to_fg_str()],
            Style::Fail | Style::ExceptionMessage => vec![Color::Red.to_fg_str()],
            Style::BadLabel => vec![Color::White.to_fg_str(), Color::Red.to_bg_str()],
            Style::ExceptionStacktrace => vec![DIM.into(), Color::Red.to_fg_str()],
        };
        format!("\x1b[{}m{text}\x1b[0m", params.join(";"))
    }
}

impl<W: Write> OutputProvider for ConsoleOutputProvider<W> {
    fn output_line(&mut self, args: fmt::Arguments<'_>) {
        let painted = self.paint(&args.to_string());
        let _ = writeln!(self.out, "{painted}");
    }

    fn output(&mut self, text: &str) {
        let painted = self.paint(text);
        let _ = write!(self.out, "{painted}");
    }

    fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(console: ConsoleOutputProvider<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_output() {
        let mut console = ConsoleOutputProvider::new(Vec::new(), false);
        console.output("  ");
        console.output_line(format_args!("Tests Run: {}", 3));
        console.set_style_fail();
        console.blank_line();
        console.output_line(format_args!("Failed: {}", 1));
        console.reset_style();
        assert_eq!(written(console), "  Tests Run: 3\n\nFailed: 1\n");
    }

    #[test]
    fn test_style_tracks_last_call() {
        let mut console = ConsoleOutputProvider::new(Vec::new(), false);
        assert_eq!(console.style(), Style::Neutral);
        console.set_style_bad_label();
        assert_eq!(console.style(), Style::BadLabel);
        console.set_style_exception_stacktrace();
        assert_eq!(console.style(), Style::ExceptionStacktrace);
        console.reset_style();
        assert_eq!(console.style(), Style::Neutral);
    }

    #[test]
    fn test_colored_output_wraps_text() {
        let mut console = ConsoleOutputProvider::new(Vec::new(), true);
        console.set_style_pass();
        console.output_line(format_args!("works: Pass"));
        console.set_style_bad_label();
        console.output("Failed: 1");
        console.set_style_exception_stacktrace();
        console.output("at src/lib.rs:3:5");
        console.reset_style();
        console.output_line(format_args!("done"));
        assert_eq!(
            written(console),
            "\u{1b}[32mworks: Pass\u{1b}[0m\n\u{1b}[37;41mFailed: 1\u{1b}[0m\u{1b}[2;31mat src/lib.rs:3:5\u{1b}[0mdone\n"
        );
    }

    #[test]
    fn test_color_choice_is_local_to_each_provider() {
        let mut colored = ConsoleOutputProvider::new(Vec::new(), true);
        let mut plain = ConsoleOutputProvider::new(Vec::new(), false);
        colored.set_style_fail();
        plain.set_style_fail();
        colored.output("Failed: 2");
        plain.output("Failed: 2");
        assert_eq!(written(plain), "Failed: 2");
        assert_eq!(written(colored), "\u{1b}[31mFailed: 2\u{1b}[0m");
    }
}
