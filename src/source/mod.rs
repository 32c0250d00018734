// src/source/mod.rs

//! Recipe sources
//!
//! A [`RecipeSource`] is a named capability that can:
//! - fetch a recipe by its full identifier, as a [`Process`]
//! - list candidates matching a partial identifier
//! - list identifiers similar to one that was not found
//!
//! Sources are compared by configuration (e.g. their root path), never by
//! what they have fetched. Candidate and similarity searches are best
//! effort: internal failures produce an empty list.

mod cookbook;
mod registry;
pub mod store;

pub use cookbook::LazyCookbookSource;
pub use registry::SourceRegistry;
pub use store::{LocalStore, RecipeStore};

use crate::event::Event;
use crate::identifier::{Identifier, PartialRecipeIdentifier, RecipeIdentifier};
use crate::process::Process;
use crate::recipe::Recipe;
use async_trait::async_trait;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Capability for resolving recipes
#[async_trait]
pub trait RecipeSource: fmt::Display + Send + Sync {
    /// Name that identifiers use to pin this source (`org/recipe@name`)
    fn name(&self) -> &Identifier;

    /// Fetch a recipe
    ///
    /// Fails with a source mismatch before any I/O if the identifier is
    /// pinned to another source.
    fn fetch(self: Arc<Self>, identifier: &RecipeIdentifier) -> Process<Event, Recipe>;

    /// Identifiers whose recipe name equals the partial's
    async fn find_candidates(&self, partial: &PartialRecipeIdentifier) -> Vec<RecipeIdentifier>;

    /// All known identifiers, closest to `identifier` first
    async fn find_similar(&self, identifier: &RecipeIdentifier) -> Vec<RecipeIdentifier>;
}

/// Shared handle to a recipe source
///
/// Errors carry one of these so the error path can query the source that
/// raised them.
#[derive(Clone)]
pub struct SourceRef(Arc<dyn RecipeSource>);

impl SourceRef {
    pub fn new<S: RecipeSource + 'static>(source: S) -> Self {
        Self(Arc::new(source))
    }

    pub fn fetch(&self, identifier: &RecipeIdentifier) -> Process<Event, Recipe> {
        Arc::clone(&self.0).fetch(identifier)
    }
}

impl From<Arc<dyn RecipeSource>> for SourceRef {
    fn from(source: Arc<dyn RecipeSource>) -> Self {
        Self(source)
    }
}

impl Deref for SourceRef {
    type Target = dyn RecipeSource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceRef").field(&self.0.to_string()).finish()
    }
}
