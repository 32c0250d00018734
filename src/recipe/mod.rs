// src/recipe/mod.rs

//! Recipe definitions
//!
//! A recipe describes a dependency: its published versions, where the
//! sources for each version live, and what each version depends on.
//! This module only models the payload; fetching recipes is done by a
//! [`RecipeSource`](crate::source::RecipeSource).

mod format;

pub use format::{Recipe, RecipeVersion, VersionSource};
