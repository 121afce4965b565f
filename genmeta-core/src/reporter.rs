//! Console status reporting.
//!
//! The runner describes *what* happened through [`Reporter`]; implementations
//! decide how it looks. A status line is opened with [`Reporter::begin`] and
//! closed by exactly one of [`Reporter::success`] or [`Reporter::failure`].

use std::io::{self, Write};

use owo_colors::OwoColorize;

/// Sink for the runner's console contract.
pub trait Reporter {
    /// Open a status line. No newline is written.
    fn begin(&mut self, status: &str);

    /// Close the open status line with a success indicator.
    fn success(&mut self);

    /// Close the open status line with a failure indicator.
    fn failure(&mut self);

    /// Print a diagnostic on its own line.
    fn detail(&mut self, text: &str);
}

/// Writes status lines to stdout, optionally coloured.
pub struct TerminalReporter<W: Write = io::Stdout> {
    out: W,
    color: bool,
}

impl TerminalReporter {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        // Write errors are ignored; the exit code alone carries the outcome.
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn begin(&mut self, status: &str) {
        self.write(status);
    }

    fn success(&mut self) {
        let text = if self.color {
            format!(" {}\n", "Success".green())
        } else {
            " Success\n".to_string()
        };
        self.write(&text);
    }

    fn failure(&mut self) {
        let text = if self.color {
            format!(" {}\n", "Failure".red())
        } else {
            " Failure\n".to_string()
        };
        self.write(&text);
    }

    fn detail(&mut self, text: &str) {
        self.write(&format!("{}\n", text));
    }
}

/// One reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin(String),
    Success,
    Failure,
    Detail(String),
}

/// Records events in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn successes(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Success).count()
    }

    pub fn failures(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Failure).count()
    }

    /// Render the events the way an uncoloured terminal would show them.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            match event {
                Event::Begin(status) => out.push_str(status),
                Event::Success => out.push_str(" Success\n"),
                Event::Failure => out.push_str(" Failure\n"),
                Event::Detail(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
        out
    }
}

impl Reporter for RecordingReporter {
    fn begin(&mut self, status: &str) {
        self.events.push(Event::Begin(status.to_string()));
    }

    fn success(&mut self) {
        self.events.push(Event::Success);
    }

    fn failure(&mut self) {
        self.events.push(Event::Failure);
    }

    fn detail(&mut self, text: &str) {
        self.events.push(Event::Detail(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_terminal_output() {
        let mut reporter = TerminalReporter::new(Vec::new(), false);
        reporter.begin("Cleaning up... ");
        reporter.failure();
        reporter.detail("failed to remove 'main.h'");

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "Cleaning up...  Failure\nfailed to remove 'main.h'\n");
    }

    #[test]
    fn test_colored_terminal_output() {
        let mut reporter = TerminalReporter::new(Vec::new(), true);
        reporter.begin("Cleaning up... ");
        reporter.success();

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "Cleaning up...  \u{1b}[32mSuccess\u{1b}[39m\n");
    }

    #[test]
    fn test_recording_transcript_matches_terminal() {
        let mut recording = RecordingReporter::new();
        let mut terminal = TerminalReporter::new(Vec::new(), false);
        for reporter in [&mut recording as &mut dyn Reporter, &mut terminal] {
            reporter.begin("Generating metadata (gen)... ");
            reporter.success();
        }

        let plain = String::from_utf8(terminal.into_inner()).unwrap();
        assert_eq!(recording.transcript(), plain);
        assert_eq!(recording.successes(), 1);
        assert_eq!(recording.failures(), 0);
    }
}
