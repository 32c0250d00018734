// src/terminal.rs

//! The painted region of the terminal
//!
//! Only the render pipeline writes here. Each [`FrameSink::flip`] replaces
//! the previously painted frame in place instead of appending below it.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;

/// Destination for rendered frames
pub trait FrameSink: Send {
    /// Replace the painted region with `frame`
    fn flip(&mut self, frame: &str);

    /// Leave the last frame on screen and release the terminal
    fn finish(&mut self);

    /// Whether frames may contain ANSI colors
    fn styled(&self) -> bool {
        false
    }
}

/// Frame sink painting to stdout
///
/// On a terminal the frame is drawn through an indicatif bar, which clears
/// and redraws its own lines. Otherwise only the final frame is printed so
/// piped output is not littered with intermediate states.
pub struct TerminalBuffer {
    bar: Option<ProgressBar>,
    last: Option<String>,
}

impl TerminalBuffer {
    pub fn stdout() -> Self {
        let bar = std::io::stdout().is_terminal().then(|| {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{msg}")
                    .expect("Invalid frame template"),
            );
            bar
        });
        Self { bar, last: None }
    }
}

impl FrameSink for TerminalBuffer {
    fn flip(&mut self, frame: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(frame.to_string());
        }
        self.last = Some(frame.to_string());
    }

    fn finish(&mut self) {
        match self.bar.take() {
            Some(bar) => bar.finish(),
            None => {
                if let Some(frame) = self.last.take()
                    && !frame.is_empty()
                {
                    println!("{frame}");
                }
            }
        }
    }

    fn styled(&self) -> bool {
        self.bar.is_some()
    }
}

/// Frame sink that records every write
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<String>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl FrameSink for MemorySink {
    fn flip(&mut self, frame: &str) {
        self.frames.push(frame.to_string());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
