// src/lib.rs

//! Buckaroo recipe resolution
//!
//! Resolves dependency identifiers against recipe sources and reports what
//! happens on a live, repainted terminal view.
//!
//! # Architecture
//!
//! - Processes: every fetch is a cold computation that reports progress
//!   events before producing a recipe or a typed error
//! - Sources: cookbooks on disk, routed by `org/recipe@source` pins
//! - Pipeline: events fan out to progress, stats and summary views, which
//!   are sampled at a fixed rate into deduplicated frames
//! - Recovery: a recipe that is not found is answered with suggestions from
//!   the source that was asked

pub mod config;
mod error;
pub mod event;
pub mod executor;
pub mod identifier;
pub mod levenshtein;
pub mod pipeline;
pub mod process;
pub mod recipe;
pub mod routine;
pub mod source;
pub mod telemetry;
pub mod terminal;
pub mod view;

pub use error::{Error, FetchCause, RecipeError, Result};
pub use event::Event;
pub use identifier::{
    Identifier, IdentifierParseError, PartialRecipeIdentifier, RecipeIdentifier,
};
pub use pipeline::{Outcome, RenderSettings, Routine};
pub use process::{Emitter, Process, Step};
pub use recipe::{Recipe, RecipeVersion, VersionSource};
pub use routine::Command;
pub use source::{LazyCookbookSource, RecipeSource, SourceRef, SourceRegistry};
