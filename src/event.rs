// src/event.rs

//! Progress events emitted by routines
//!
//! Every long-running operation reports what it is doing through these
//! events. The render pipeline folds them into the progress, stats and
//! summary views; nothing else interprets them.

use crate::identifier::{Identifier, RecipeIdentifier};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A recipe fetch began against a source
    FetchStarted {
        identifier: RecipeIdentifier,
        source: Identifier,
    },

    /// A file was read from disk
    FileRead { path: PathBuf, bytes: u64 },

    /// A recipe was fetched and parsed
    RecipeFetched {
        identifier: RecipeIdentifier,
        versions: usize,
    },

    /// A search produced a matching identifier
    Candidate(RecipeIdentifier),

    /// Free-form status line
    Notice(String),

    /// The routine finished its work
    Finished { summary: String },
}

impl Event {
    pub fn notice(message: impl Into<String>) -> Self {
        Event::Notice(message.into())
    }
}
