// src/cli.rs
//! CLI definitions for buckaroo
//!
//! Parsing only; the routines behind each command live in the library.

use buckaroo::identifier::{PartialRecipeIdentifier, RecipeIdentifier};
use buckaroo::routine::Command;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "buckaroo")]
#[command(version)]
#[command(about = "Recipe resolution for the Buckaroo package manager", long_about = None)]
pub struct Cli {
    /// Configuration file (default: $BUCKAROO_HOME/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch recipes, e.g. `boost/asio` or `boost/asio@official`
    Resolve {
        /// Recipe identifiers
        #[arg(required = true)]
        identifiers: Vec<RecipeIdentifier>,
    },

    /// List recipes matching a name, e.g. `asio` or `boost/asio`
    Search {
        /// Recipe name, optionally with its organization
        partial: PartialRecipeIdentifier,
    },

    /// List recipes with names close to an identifier
    Similar {
        /// Recipe identifier
        identifier: RecipeIdentifier,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Resolve { identifiers } => Command::Resolve(identifiers),
            Commands::Search { partial } => Command::Search(partial),
            Commands::Similar { identifier } => Command::Similar(identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["buckaroo", "resolve", "boost/asio", "madler/zlib@main"]).unwrap();
        let command = Command::from(cli.command.unwrap());
        assert_eq!(
            command,
            Command::Resolve(vec![
                RecipeIdentifier::parse("boost/asio").unwrap(),
                RecipeIdentifier::parse("madler/zlib@main").unwrap(),
            ])
        );
    }

    #[test]
    fn test_rejects_invalid_identifier() {
        assert!(Cli::try_parse_from(["buckaroo", "resolve", "not-qualified"]).is_err());
        assert!(Cli::try_parse_from(["buckaroo", "resolve"]).is_err());
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = Cli::try_parse_from(["buckaroo"]).unwrap();
        assert!(cli.command.is_none());
    }
}
