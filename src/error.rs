// src/error.rs

//! Error types for recipe resolution
//!
//! Failures are converted to typed values where they are detected and
//! carried unchanged to the render pipeline, which is the only place that
//! decides how they are presented.

use crate::identifier::{Identifier, IdentifierParseError, RecipeIdentifier};
use crate::source::SourceRef;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    /// A recipe source failed to produce a recipe
    #[error(transparent)]
    RecipeError(#[from] RecipeError),

    /// An identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    IdentifierError(#[from] IdentifierParseError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error outside of a recipe fetch
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A spawned task panicked or was cancelled
    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    /// A process stream ended without a result
    #[error("Process ended without producing a result")]
    Incomplete,
}

/// Why a recipe could not be read
#[derive(Error, Debug)]
pub enum FetchCause {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed recipe: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures raised by recipe sources
///
/// Each variant names the source that raised it so the error path can go
/// back to that source for suggestions.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// The source does not contain the identifier
    #[error("{identifier} could not be found in {origin}")]
    NotFound {
        origin: SourceRef,
        identifier: RecipeIdentifier,
    },

    /// Reading or parsing the recipe failed
    #[error("Failed to fetch {identifier} from {origin}: {cause}")]
    Fetch {
        origin: SourceRef,
        identifier: RecipeIdentifier,
        #[source]
        cause: FetchCause,
    },

    /// The identifier is pinned to a different source
    #[error("{identifier} should be found on {pinned}, not {origin}")]
    SourceMismatch {
        origin: SourceRef,
        identifier: RecipeIdentifier,
        pinned: Identifier,
    },

    /// The identifier is pinned to a source that is not configured
    #[error("{identifier} is pinned to {name}, but no such recipe source is configured")]
    UnknownSource {
        name: Identifier,
        identifier: RecipeIdentifier,
    },
}

impl RecipeError {
    /// The identifier that failed
    pub fn identifier(&self) -> &RecipeIdentifier {
        match self {
            RecipeError::NotFound { identifier, .. }
            | RecipeError::Fetch { identifier, .. }
            | RecipeError::SourceMismatch { identifier, .. }
            | RecipeError::UnknownSource { identifier, .. } => identifier,
        }
    }

    /// The source that raised the error, if one was involved
    pub fn origin(&self) -> Option<&SourceRef> {
        match self {
            RecipeError::NotFound { origin, .. }
            | RecipeError::Fetch { origin, .. }
            | RecipeError::SourceMismatch { origin, .. } => Some(origin),
            RecipeError::UnknownSource { .. } => None,
        }
    }
}
