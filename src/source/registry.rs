// src/source/registry.rs

//! Named collection of recipe sources
//!
//! Pinned identifiers (`org/recipe@name`) are routed to the source called
//! `name`; everything else goes to the default source, which is the first
//! one registered.

use crate::error::{Error, RecipeError, Result};
use crate::event::Event;
use crate::identifier::{Identifier, PartialRecipeIdentifier, RecipeIdentifier};
use crate::levenshtein;
use crate::process::Process;
use crate::recipe::Recipe;
use crate::source::SourceRef;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SourceRegistry {
    /// Registration order; index 0 is the default
    sources: Vec<SourceRef>,
}

impl SourceRegistry {
    /// Create a registry whose default is `source`
    pub fn new(source: SourceRef) -> Self {
        Self {
            sources: vec![source],
        }
    }

    /// Register another source; names must be unique
    pub fn with_source(mut self, source: SourceRef) -> Result<Self> {
        if self.get(source.name()).is_some() {
            return Err(Error::ConfigError(format!(
                "Recipe source '{}' is configured more than once",
                source.name()
            )));
        }
        self.sources.push(source);
        Ok(self)
    }

    pub fn default_source(&self) -> &SourceRef {
        &self.sources[0]
    }

    pub fn get(&self, name: &Identifier) -> Option<&SourceRef> {
        self.sources.iter().find(|source| source.name() == name)
    }

    /// The source an identifier must be resolved against
    ///
    /// Fails with the pinned name when no source of that name exists.
    pub fn route<'a, 'b>(
        &'a self,
        identifier: &'b RecipeIdentifier,
    ) -> std::result::Result<&'a SourceRef, &'b Identifier> {
        match &identifier.source {
            Some(name) => self.get(name).ok_or(name),
            None => Ok(self.default_source()),
        }
    }

    pub fn fetch(&self, identifier: &RecipeIdentifier) -> Process<Event, Recipe> {
        match self.route(identifier) {
            Ok(source) => {
                debug!("Routing {} to {}", identifier, source);
                source.fetch(identifier)
            }
            Err(name) => {
                let name = name.clone();
                let identifier = identifier.clone();
                Process::failed(move || {
                    RecipeError::UnknownSource {
                        name: name.clone(),
                        identifier: identifier.clone(),
                    }
                    .into()
                })
            }
        }
    }

    /// Candidates from every source, first occurrence wins
    pub async fn find_candidates(&self, partial: &PartialRecipeIdentifier) -> Vec<RecipeIdentifier> {
        let mut found = Vec::new();
        for source in &self.sources {
            for candidate in source.find_candidates(partial).await {
                if !found.contains(&candidate) {
                    found.push(candidate);
                }
            }
        }
        found
    }

    /// Similar identifiers from every source, closest first
    pub async fn find_similar(&self, identifier: &RecipeIdentifier) -> Vec<RecipeIdentifier> {
        let mut found = Vec::new();
        for source in &self.sources {
            for candidate in source.find_similar(identifier).await {
                if !found.contains(&candidate) {
                    found.push(candidate);
                }
            }
        }
        let target = identifier.without_source().encode();
        levenshtein::closest(found, &target, RecipeIdentifier::encode)
    }
}
