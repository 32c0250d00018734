// src/source/store.rs

//! Filesystem access for cookbook sources
//!
//! The cookbook never touches the filesystem directly; it goes through a
//! [`RecipeStore`] so reads stay distinguishable (not found, permission,
//! malformed) and can be observed in tests.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Read access to a tree of recipe files
#[async_trait]
pub trait RecipeStore: fmt::Debug + Send + Sync {
    /// Read a recipe file as text
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// List every `recipes/<organization>/<recipe>.json` under `root`,
    /// sorted by path
    async fn list_recipe_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Store backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[async_trait]
impl RecipeStore for LocalStore {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn list_recipe_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let recipes = root.join("recipes");
        tokio::task::spawn_blocking(move || scan_recipes(&recipes))
            .await
            .map_err(io::Error::other)?
    }
}

fn scan_recipes(recipes: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(recipes)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        } else {
            debug!("Skipping non-recipe entry in cookbook: {}", path.display());
        }
    }

    Ok(files)
}
