// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use buckaroo::{Identifier, LazyCookbookSource, RecipeIdentifier, SourceRef, SourceRegistry};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A cookbook in a temporary directory
///
/// Keep the value alive for as long as the cookbook is used.
pub struct TestCookbook {
    pub dir: TempDir,
    pub name: Identifier,
}

impl TestCookbook {
    pub fn new(name: &str) -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            name: Identifier::parse(name).unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the recipe file for `identifier`
    pub fn recipe_path(&self, identifier: &str) -> PathBuf {
        let identifier = id(identifier);
        self.root()
            .join("recipes")
            .join(identifier.organization.as_str())
            .join(format!("{}.json", identifier.recipe))
    }

    /// Write a recipe with the given versions, each fetched from git
    pub fn with_recipe(self, identifier: &str, versions: &[&str]) -> Self {
        let parsed = id(identifier);
        let versions: serde_json::Map<String, serde_json::Value> = versions
            .iter()
            .map(|version| {
                (
                    version.to_string(),
                    json!({
                        "source": {
                            "url": format!("https://github.com/{}/{}.git", parsed.organization, parsed.recipe),
                            "commit": format!("{:0>40}", version.replace('.', "")),
                        },
                        "dependencies": {},
                    }),
                )
            })
            .collect();

        let recipe = json!({
            "name": parsed.recipe.as_str(),
            "license": "MIT",
            "versions": versions,
        });
        self.with_raw(identifier, &serde_json::to_string_pretty(&recipe).unwrap())
    }

    /// Write arbitrary text as the recipe file for `identifier`
    pub fn with_raw(self, identifier: &str, content: &str) -> Self {
        let path = self.recipe_path(identifier);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn source(&self) -> SourceRef {
        SourceRef::new(LazyCookbookSource::new(self.name.clone(), self.root()))
    }

    pub fn registry(&self) -> Arc<SourceRegistry> {
        Arc::new(SourceRegistry::new(self.source()))
    }
}

pub fn id(s: &str) -> RecipeIdentifier {
    RecipeIdentifier::parse(s).unwrap()
}
