// src/pipeline/failure.rs

//! Presentation of a failed routine
//!
//! A recipe that could not be found is answered with suggestions from the
//! source that failed to find it. Every other failure is written, with its
//! cause chain, to a diagnostics file that the user can attach to a report.

use crate::error::{Error, RecipeError};
use crate::identifier::{PartialRecipeIdentifier, RecipeIdentifier};
use crate::view::{Color, Component};
use std::error::Error as _;
use std::fmt::Write as _;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Diagnostics file, relative to the working directory
pub const DIAGNOSTICS_FILE: &str = "buckaroo-stacktrace.log";

/// Upper bound on "did you mean" suggestions
pub const MAX_SUGGESTIONS: usize = 3;

/// Build the panel shown in place of the last frame
///
/// Side effect: non-lookup failures are appended to `diagnostics`.
pub async fn error_panel(error: &Error, diagnostics: &Path) -> Component {
    let headline = Component::colored(format!("Error! \n{error}"), Color::Red);

    if let Error::RecipeError(RecipeError::NotFound { origin, identifier }) = error {
        let partial = PartialRecipeIdentifier::any_organization(identifier.recipe.clone());
        let suggestions: Vec<RecipeIdentifier> = origin
            .find_candidates(&partial)
            .await
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .collect();
        debug!("{} suggestions for {}", suggestions.len(), identifier);

        if suggestions.is_empty() {
            return headline;
        }
        return Component::stack(vec![
            headline,
            Component::text("Maybe you meant to install one of the following?"),
            Component::list(
                suggestions
                    .iter()
                    .map(|candidate| Component::colored(candidate.encode(), Color::Cyan)),
            ),
        ]);
    }

    write_diagnostics(diagnostics, error).await;
    Component::stack(vec![
        headline,
        Component::colored(
            format!("The stacktrace was written to {}. ", diagnostics.display()),
            Color::Yellow,
        ),
    ])
}

/// Timestamped report of an error and everything that caused it
pub fn diagnostic_record(error: &Error) -> String {
    let mut record = format!("[{}] {}\n", chrono::Utc::now().to_rfc3339(), error);

    let mut cause = error.source();
    while let Some(inner) = cause {
        let _ = writeln!(record, "  caused by: {inner}");
        cause = inner.source();
    }
    let _ = writeln!(record, "  {error:?}");

    record
}

/// Append a record to the diagnostics file; failures are only logged
pub async fn write_diagnostics(path: &Path, error: &Error) {
    let record = diagnostic_record(error);

    let written = async {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(record.as_bytes()).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        debug!("Could not write diagnostics to {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchCause;
    use crate::identifier::Identifier;
    use crate::source::{LazyCookbookSource, SourceRef};
    use std::fs;
    use std::io;

    fn id(s: &str) -> RecipeIdentifier {
        RecipeIdentifier::parse(s).unwrap()
    }

    fn cookbook_with(root: &Path, identifiers: &[&str]) -> SourceRef {
        for identifier in identifiers {
            let identifier = id(identifier);
            let dir = root.join("recipes").join(identifier.organization.as_str());
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{}.json", identifier.recipe)), "{}").unwrap();
        }
        SourceRef::new(LazyCookbookSource::new(
            Identifier::parse("official").unwrap(),
            root,
        ))
    }

    #[tokio::test]
    async fn test_not_found_suggests_other_organizations() {
        let temp_dir = tempfile::tempdir().unwrap();
        let origin = cookbook_with(
            temp_dir.path(),
            &["a/zlib", "b/zlib", "c/zlib", "d/zlib", "a/boost"],
        );
        let diagnostics = temp_dir.path().join(DIAGNOSTICS_FILE);

        let error = Error::from(RecipeError::NotFound {
            origin,
            identifier: id("madler/zlib"),
        });
        let panel = error_panel(&error, &diagnostics).await.render(60);

        let lines: Vec<&str> = panel.lines().collect();
        assert_eq!(lines[0], "Error!");
        assert!(lines[1].contains("madler/zlib could not be found"));
        assert!(panel.contains("Maybe you meant to install one of the following?"));
        assert!(panel.ends_with("• a/zlib\n• b/zlib\n• c/zlib"));
        assert!(!diagnostics.exists());
    }

    #[tokio::test]
    async fn test_not_found_without_candidates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let origin = cookbook_with(temp_dir.path(), &["a/boost"]);

        let error = Error::from(RecipeError::NotFound {
            origin,
            identifier: id("madler/zlib"),
        });
        let panel = error_panel(&error, &temp_dir.path().join(DIAGNOSTICS_FILE))
            .await
            .render(60);
        assert!(!panel.contains("Maybe you meant"));
    }

    #[tokio::test]
    async fn test_other_failures_are_persisted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let origin = cookbook_with(temp_dir.path(), &[]);
        let diagnostics = temp_dir.path().join(DIAGNOSTICS_FILE);

        let error = Error::from(RecipeError::Fetch {
            origin,
            identifier: id("a/x"),
            cause: FetchCause::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        });
        let panel = error_panel(&error, &diagnostics).await.render(60);
        assert!(panel.contains("The stacktrace was written to"));

        let record = fs::read_to_string(&diagnostics).unwrap();
        assert!(record.starts_with('['));
        assert!(record.contains("Failed to fetch a/x"));
        assert!(record.contains("caused by: I/O error: denied"));

        // Appends rather than truncates
        error_panel(&error, &diagnostics).await;
        let record = fs::read_to_string(&diagnostics).unwrap();
        assert_eq!(record.matches("Failed to fetch a/x").count(), 2);
    }

    #[tokio::test]
    async fn test_unwritable_diagnostics_are_ignored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let diagnostics = temp_dir.path().join("missing-dir").join(DIAGNOSTICS_FILE);

        let panel = error_panel(&Error::Incomplete, &diagnostics).await;
        assert!(panel.render(60).contains("Error!"));
        assert!(!diagnostics.exists());
    }
}
