use std::fmt;

use super::{OutputProvider, Style};

/// One call made on a [`RecordingOutputProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Line(String),
    Text(String),
    Style(Style),
}

/// Keeps everything written to it, for assertions on reports.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutputProvider {
    events: Vec<OutputEvent>,
}

impl RecordingOutputProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    /// Everything written, styles dropped.
    pub fn transcript(&self) -> String {
        let mut transcript = String::new();
        for event in &self.events {
            match event {
                OutputEvent::Line(line) => {
                    transcript.push_str(line);
                    transcript.push('\n');
                }
                OutputEvent::Text(text) => transcript.push_str(text),
                OutputEvent::Style(_) => {}
            }
        }
        transcript
    }

    pub fn lines(&self) -> Vec<String> {
        self.transcript().lines().map(str::to_string).collect()
    }

    pub fn used_style(&self, style: Style) -> bool {
        self.events.contains(&OutputEvent::Style(style))
    }

    /// Style in effect when the first line containing `needle` was finished.
    pub fn style_of_line(&self, needle: &str) -> Option<Style> {
        let mut style = Style::Neutral;
        for event in &self.events {
            match event {
                OutputEvent::Style(next) => style = *next,
                OutputEvent::Line(line) if line.contains(needle) => return Some(style),
                _ => {}
            }
        }
        None
    }
}

impl OutputProvider for RecordingOutputProvider {
    fn output_line(&mut self, args: fmt::Arguments<'_>) {
        self.events.push(OutputEvent::Line(args.to_string()));
    }

    fn output(&mut self, text: &str) {
        self.events.push(OutputEvent::Text(text.to_string()));
    }

    fn set_style(&mut self, style: Style) {
        self.events.push(OutputEvent::Style(style));
    }
}
