// src/identifier.rs

//! Recipe identifiers
//!
//! Recipes are named `organization/recipe`, optionally pinned to a named
//! recipe source with `organization/recipe@source`.
//!
//! Examples:
//! - `boost/asio` - resolved against the default source
//! - `boost/asio@official` - resolved only against the source named `official`
//!
//! A partial identifier (`asio` or `boost/asio`) is what a user types when
//! searching; the organization may be left out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest accepted identifier component
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// A validated name: organization, recipe or source
///
/// Starts with an ASCII letter or digit, followed by letters, digits,
/// `-`, `_` or `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a name
    pub fn parse(s: &str) -> Result<Self, IdentifierParseError> {
        let first = s.chars().next().ok_or(IdentifierParseError::Empty)?;

        if s.len() > MAX_IDENTIFIER_LENGTH {
            return Err(IdentifierParseError::TooLong {
                identifier: s.to_string(),
                max: MAX_IDENTIFIER_LENGTH,
            });
        }
        if !first.is_ascii_alphanumeric() {
            return Err(IdentifierParseError::InvalidStart(s.to_string()));
        }
        if let Some(character) = s.chars().find(|c| !is_identifier_char(*c)) {
            return Err(IdentifierParseError::InvalidCharacter {
                identifier: s.to_string(),
                character,
            });
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A fully-qualified reference to a recipe
///
/// Format: `organization/recipe[@source]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeIdentifier {
    pub organization: Identifier,
    pub recipe: Identifier,
    /// When present, resolution must happen against this source only
    pub source: Option<Identifier>,
}

impl RecipeIdentifier {
    pub fn new(organization: Identifier, recipe: Identifier) -> Self {
        Self {
            organization,
            recipe,
            source: None,
        }
    }

    /// Pin this identifier to a named source
    pub fn with_source(mut self, source: Identifier) -> Self {
        self.source = Some(source);
        self
    }

    /// The same identifier with any source pin removed
    pub fn without_source(&self) -> Self {
        Self {
            organization: self.organization.clone(),
            recipe: self.recipe.clone(),
            source: None,
        }
    }

    /// Parse `organization/recipe[@source]`
    pub fn parse(s: &str) -> Result<Self, IdentifierParseError> {
        let (body, source) = match s.split_once('@') {
            Some((body, source)) => (body, Some(Identifier::parse(source)?)),
            None => (s, None),
        };

        let (organization, recipe) = body
            .split_once('/')
            .ok_or_else(|| IdentifierParseError::MissingOrganization(s.to_string()))?;

        Ok(Self {
            organization: Identifier::parse(organization)?,
            recipe: Identifier::parse(recipe)?,
            source,
        })
    }

    /// Textual form, inverse of [`RecipeIdentifier::parse`]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecipeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.recipe)?;
        if let Some(source) = &self.source {
            write!(f, "@{}", source)?;
        }
        Ok(())
    }
}

impl FromStr for RecipeIdentifier {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecipeIdentifier::parse(s)
    }
}

/// A possibly incomplete identifier typed by a user
///
/// Format: `recipe` or `organization/recipe`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialRecipeIdentifier {
    /// `None` matches any organization
    pub organization: Option<Identifier>,
    pub recipe: Identifier,
}

impl PartialRecipeIdentifier {
    /// A partial that matches the recipe name in every organization
    pub fn any_organization(recipe: Identifier) -> Self {
        Self {
            organization: None,
            recipe,
        }
    }

    pub fn parse(s: &str) -> Result<Self, IdentifierParseError> {
        match s.split_once('/') {
            Some((organization, recipe)) => Ok(Self {
                organization: Some(Identifier::parse(organization)?),
                recipe: Identifier::parse(recipe)?,
            }),
            None => Ok(Self::any_organization(Identifier::parse(s)?)),
        }
    }

    /// Whether a full identifier is a candidate for this partial
    pub fn matches(&self, identifier: &RecipeIdentifier) -> bool {
        self.recipe == identifier.recipe
            && self
                .organization
                .as_ref()
                .is_none_or(|organization| *organization == identifier.organization)
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl From<&RecipeIdentifier> for PartialRecipeIdentifier {
    fn from(identifier: &RecipeIdentifier) -> Self {
        Self {
            organization: Some(identifier.organization.clone()),
            recipe: identifier.recipe.clone(),
        }
    }
}

impl fmt::Display for PartialRecipeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.organization {
            Some(organization) => write!(f, "{}/{}", organization, self.recipe),
            None => write!(f, "{}", self.recipe),
        }
    }
}

impl FromStr for PartialRecipeIdentifier {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartialRecipeIdentifier::parse(s)
    }
}

/// Errors that can occur when parsing an identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierParseError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier '{identifier}' is longer than {max} characters")]
    TooLong { identifier: String, max: usize },

    #[error("Identifier '{0}' must start with a letter or digit")]
    InvalidStart(String),

    #[error("Invalid character '{character}' in identifier '{identifier}'")]
    InvalidCharacter { identifier: String, character: char },

    #[error("Missing organization in '{0}' (expected organization/recipe)")]
    MissingOrganization(String),
}
