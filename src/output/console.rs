//! Line-oriented console reporter for import events.
//!
//! One reporter lives for the whole process and owns the terminal.
//! Quiet runs only show the milestones a user cares about (command run,
//! revision creation, upload, outcome) plus any failure. Verbose runs
//! show every step and echo the command's stdout.

use crate::events::{EventSink, ImportEvent, Status, Step};
use crate::utils::error::ImportError;
use colored::*;
use std::io::{self, Stderr, Write};

/// Renders events to a writer, stderr by default
pub struct ConsoleReporter<W: Write = Stderr> {
    out: W,
    verbose: bool,
}

impl ConsoleReporter<Stderr> {
    pub fn stderr(verbose: bool) -> Self {
        Self::new(io::stderr(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print what the user needs to know about a failed run
    ///
    /// The failing step's message was already rendered from its event.
    /// A failed command's stderr is always shown; status codes and error
    /// bodies only in verbose mode.
    pub fn report_error(&mut self, err: &ImportError) {
        if let Some(stderr) = err.command_stderr() {
            let _ = writeln!(self.out, "\n  Command error output:");
            let _ = writeln!(self.out, "{}", stderr);
        }

        if self.verbose {
            if let Some(detail) = err.verbose_detail() {
                let _ = writeln!(self.out, "{}", detail.red());
            }
        }
        let _ = self.out.flush();
    }

    fn should_show(&self, event: &ImportEvent) -> bool {
        if self.verbose {
            return true;
        }

        match event.status {
            Status::Failed | Status::Info => true,
            Status::Started | Status::Succeeded => matches!(
                event.step,
                Step::RunCommand | Step::CreateRevision | Step::Upload | Step::Complete
            ),
        }
    }
}

impl<W: Write> EventSink for ConsoleReporter<W> {
    fn event(&mut self, event: ImportEvent) {
        if !self.should_show(&event) {
            return;
        }

        let _ = writeln!(self.out, "{}", render_event(&event));
        let _ = self.out.flush();
    }

    fn output(&mut self, chunk: &[u8]) {
        let _ = writeln!(self.out, ">  {}", String::from_utf8_lossy(chunk).trim_end());
    }
}

/// Render a single event as one terminal line
pub fn render_event(event: &ImportEvent) -> String {
    let symbol = match event.status {
        Status::Started => "…".cyan(),
        Status::Succeeded => "✔".green(),
        Status::Failed => "✖".red(),
        Status::Info => "ℹ".blue(),
    };
    format!("{} {}", symbol, event.message)
}
