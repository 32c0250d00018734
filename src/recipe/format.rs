// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are JSON files stored in a cookbook at
//! `recipes/{organization}/{recipe}.json`. Each lists the published versions
//! of a dependency together with where to fetch its sources from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved recipe definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Human readable name
    pub name: String,

    /// Project homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// License identifier (SPDX)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Published versions keyed by version string
    #[serde(default)]
    pub versions: BTreeMap<String, RecipeVersion>,
}

impl Recipe {
    /// Parse a recipe from its JSON text
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Version strings in the order they appear in the cookbook
    pub fn version_names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Total number of dependency declarations across every version
    pub fn dependency_count(&self) -> usize {
        self.versions.values().map(|v| v.dependencies.len()).sum()
    }
}

/// A single published version of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeVersion {
    /// Where the sources for this version come from
    pub source: VersionSource,

    /// Build target inside the fetched sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Dependencies as `organization/recipe` -> version requirement
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// Source location for a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSource {
    /// A pinned commit of a git repository
    Git { url: String, commit: String },

    /// A downloadable archive verified by checksum
    #[serde(rename_all = "camelCase")]
    Archive {
        url: String,
        sha256: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_path: Option<String>,
    },
}
