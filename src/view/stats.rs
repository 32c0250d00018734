// src/view/stats.rs

use super::{Color, Component, Projection};
use crate::event::Event;

/// Aggregate counters over the whole routine
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub fetches_started: usize,
    pub recipes_fetched: usize,
    pub files_read: usize,
    pub bytes_read: u64,
    pub candidates: usize,
}

impl StatsView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Projection for StatsView {
    fn apply(&mut self, event: &Event) {
        match event {
            Event::FetchStarted { .. } => self.fetches_started += 1,
            Event::RecipeFetched { .. } => self.recipes_fetched += 1,
            Event::FileRead { bytes, .. } => {
                self.files_read += 1;
                self.bytes_read += bytes;
            }
            Event::Candidate(_) => self.candidates += 1,
            Event::Notice(_) | Event::Finished { .. } => {}
        }
    }

    fn render(&self) -> Component {
        let mut parts = Vec::new();
        if self.fetches_started > 0 {
            parts.push(format!(
                "{}/{} recipes fetched",
                self.recipes_fetched, self.fetches_started
            ));
        }
        if self.files_read > 0 {
            parts.push(format!(
                "{} files read ({})",
                self.files_read,
                format_bytes(self.bytes_read)
            ));
        }
        if self.candidates > 0 {
            parts.push(format!("{} matches", self.candidates));
        }

        if parts.is_empty() {
            Component::empty()
        } else {
            Component::colored(parts.join(", "), Color::Dim)
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
