// src/routine.rs

//! Commands and the routines that carry them out

use crate::event::Event;
use crate::identifier::{PartialRecipeIdentifier, RecipeIdentifier};
use crate::pipeline::Routine;
use crate::process::Process;
use crate::recipe::Recipe;
use crate::source::SourceRegistry;
use std::sync::Arc;

/// Most identifiers listed by [`Command::Similar`]
pub const MAX_SIMILAR: usize = 5;

/// A parsed user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch every recipe, concurrently
    Resolve(Vec<RecipeIdentifier>),
    /// List identifiers matching a partial identifier
    Search(PartialRecipeIdentifier),
    /// List identifiers close to one that may not exist
    Similar(RecipeIdentifier),
}

impl Command {
    /// The event stream carrying out this command
    pub fn routine(self, registry: Arc<SourceRegistry>) -> Routine {
        match self {
            Command::Resolve(identifiers) => resolve(identifiers, registry).events(|recipes| {
                Event::Finished {
                    summary: resolved_summary(&recipes),
                }
            }),
            Command::Search(partial) => {
                let summary_for = partial.clone();
                search(partial, registry).events(move |count| Event::Finished {
                    summary: match count {
                        0 => format!("No recipes match {summary_for}"),
                        1 => format!("1 recipe matches {summary_for}"),
                        n => format!("{n} recipes match {summary_for}"),
                    },
                })
            }
            Command::Similar(identifier) => {
                let summary_for = identifier.clone();
                similar(identifier, registry).events(move |count| Event::Finished {
                    summary: format!("{count} recipes similar to {summary_for}"),
                })
            }
        }
    }
}

/// Fetch all identifiers in parallel; results keep the input order
pub fn resolve(
    identifiers: Vec<RecipeIdentifier>,
    registry: Arc<SourceRegistry>,
) -> Process<Event, Vec<Recipe>> {
    let count = identifiers.len();
    let fetches = Process::join_all(identifiers.iter().map(|identifier| registry.fetch(identifier)));

    Process::new(move |emitter| {
        let fetches = fetches.clone();
        async move {
            emitter.emit(Event::notice(format!(
                "Resolving {count} {}...",
                if count == 1 { "recipe" } else { "recipes" }
            )));
            fetches.forward(&emitter).await
        }
    })
}

/// Emit a candidate event per match; yields the number of matches
pub fn search(
    partial: PartialRecipeIdentifier,
    registry: Arc<SourceRegistry>,
) -> Process<Event, usize> {
    Process::new(move |emitter| {
        let partial = partial.clone();
        let registry = Arc::clone(&registry);
        async move {
            emitter.emit(Event::notice(format!("Searching for {partial}...")));
            let found = registry.find_candidates(&partial).await;
            let count = found.len();
            for candidate in found {
                emitter.emit(Event::Candidate(candidate));
            }
            Ok(count)
        }
    })
}

/// Emit the closest identifiers, nearest first
pub fn similar(
    identifier: RecipeIdentifier,
    registry: Arc<SourceRegistry>,
) -> Process<Event, usize> {
    Process::new(move |emitter| {
        let identifier = identifier.clone();
        let registry = Arc::clone(&registry);
        async move {
            emitter.emit(Event::notice(format!("Looking for recipes like {identifier}...")));
            let found = registry.find_similar(&identifier).await;
            let count = found.len().min(MAX_SIMILAR);
            for candidate in found.into_iter().take(MAX_SIMILAR) {
                emitter.emit(Event::Candidate(candidate));
            }
            Ok(count)
        }
    })
}

fn resolved_summary(recipes: &[Recipe]) -> String {
    let versions: usize = recipes.iter().map(|recipe| recipe.versions.len()).sum();
    let noun = if recipes.len() == 1 { "recipe" } else { "recipes" };
    format!("Resolved {} {noun} ({versions} versions)", recipes.len())
}
