// src/source/cookbook.rs

//! Cookbook-backed recipe source
//!
//! A cookbook is a directory tree:
//!
//! ```text
//! {root}/recipes/{organization}/{recipe}.json
//! ```
//!
//! The identifier index is not loaded at construction. It is read from the
//! store each time a candidate or similarity search needs it, which is
//! normally only after a fetch has already failed.

use crate::error::{FetchCause, RecipeError, Result};
use crate::event::Event;
use crate::identifier::{Identifier, PartialRecipeIdentifier, RecipeIdentifier};
use crate::levenshtein;
use crate::process::{Emitter, Process};
use crate::recipe::Recipe;
use crate::source::store::{LocalStore, RecipeStore};
use crate::source::{RecipeSource, SourceRef};
use async_trait::async_trait;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Recipe source reading a cookbook directory on demand
#[derive(Debug, Clone)]
pub struct LazyCookbookSource {
    name: Identifier,
    root: PathBuf,
    store: Arc<dyn RecipeStore>,
}

impl LazyCookbookSource {
    /// Create a cookbook source backed by the local filesystem
    pub fn new(name: Identifier, root: impl Into<PathBuf>) -> Self {
        Self::with_store(name, root, Arc::new(LocalStore))
    }

    /// Create a cookbook source backed by a custom store
    pub fn with_store(name: Identifier, root: impl Into<PathBuf>, store: Arc<dyn RecipeStore>) -> Self {
        Self {
            name,
            root: root.into(),
            store,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a recipe file inside the cookbook
    pub fn recipe_path(&self, identifier: &RecipeIdentifier) -> PathBuf {
        self.root
            .join("recipes")
            .join(identifier.organization.as_str())
            .join(format!("{}.json", identifier.recipe))
    }

    /// Read the identifier index, in listing order
    pub async fn read_index(&self) -> io::Result<Vec<RecipeIdentifier>> {
        let files = self.store.list_recipe_files(&self.root).await?;
        Ok(files.iter().filter_map(|path| identifier_for(path)).collect())
    }

    async fn read_recipe(
        self: Arc<Self>,
        identifier: RecipeIdentifier,
        emitter: Emitter<Event>,
    ) -> Result<Recipe> {
        let origin = SourceRef::from(Arc::clone(&self) as Arc<dyn RecipeSource>);

        if let Some(pinned) = &identifier.source
            && *pinned != self.name
        {
            return Err(RecipeError::SourceMismatch {
                origin,
                pinned: pinned.clone(),
                identifier,
            }
            .into());
        }

        emitter.emit(Event::FetchStarted {
            identifier: identifier.clone(),
            source: self.name.clone(),
        });

        let path = self.recipe_path(&identifier);
        debug!("Reading recipe {} from {}", identifier, path.display());

        let text = match self.store.read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RecipeError::NotFound { origin, identifier }.into());
            }
            Err(e) => {
                return Err(RecipeError::Fetch {
                    origin,
                    identifier,
                    cause: FetchCause::Io(e),
                }
                .into());
            }
        };

        emitter.emit(Event::FileRead {
            path,
            bytes: text.len() as u64,
        });

        let recipe = match Recipe::parse(&text) {
            Ok(recipe) => recipe,
            Err(e) => {
                return Err(RecipeError::Fetch {
                    origin,
                    identifier,
                    cause: FetchCause::Malformed(e),
                }
                .into());
            }
        };

        emitter.emit(Event::RecipeFetched {
            identifier,
            versions: recipe.versions.len(),
        });

        Ok(recipe)
    }
}

/// Map `recipes/{organization}/{recipe}.json` to an identifier
fn identifier_for(path: &Path) -> Option<RecipeIdentifier> {
    let recipe = path.file_stem()?.to_str()?;
    let organization = path.parent()?.file_name()?.to_str()?;

    match (Identifier::parse(organization), Identifier::parse(recipe)) {
        (Ok(organization), Ok(recipe)) => Some(RecipeIdentifier::new(organization, recipe)),
        _ => {
            debug!("Skipping recipe file with invalid name: {}", path.display());
            None
        }
    }
}

#[async_trait]
impl RecipeSource for LazyCookbookSource {
    fn name(&self) -> &Identifier {
        &self.name
    }

    fn fetch(self: Arc<Self>, identifier: &RecipeIdentifier) -> Process<Event, Recipe> {
        let identifier = identifier.clone();
        Process::new(move |emitter| Arc::clone(&self).read_recipe(identifier.clone(), emitter))
    }

    async fn find_candidates(&self, partial: &PartialRecipeIdentifier) -> Vec<RecipeIdentifier> {
        match self.read_index().await {
            Ok(index) => index.into_iter().filter(|id| partial.matches(id)).collect(),
            Err(e) => {
                warn!("Could not read index of {}: {}", self, e);
                Vec::new()
            }
        }
    }

    async fn find_similar(&self, identifier: &RecipeIdentifier) -> Vec<RecipeIdentifier> {
        match self.read_index().await {
            Ok(index) => {
                let target = identifier.without_source().encode();
                levenshtein::closest(index, &target, RecipeIdentifier::encode)
            }
            Err(e) => {
                warn!("Could not read index of {}: {}", self, e);
                Vec::new()
            }
        }
    }
}

impl fmt::Display for LazyCookbookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cookbook {} ({})", self.name, self.root.display())
    }
}

impl PartialEq for LazyCookbookSource {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for LazyCookbookSource {}

impl Hash for LazyCookbookSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
    }
}
