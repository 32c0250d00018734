// src/view/summary.rs

use super::{Color, Component, Projection};
use crate::event::Event;
use crate::identifier::RecipeIdentifier;

/// What the routine produced
///
/// The pipeline only publishes this view once the routine has ended, so
/// intermediate states are never painted.
#[derive(Debug, Default)]
pub struct SummaryView {
    resolved: Vec<(RecipeIdentifier, usize)>,
    candidates: Vec<RecipeIdentifier>,
    finished: Option<String>,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Projection for SummaryView {
    fn apply(&mut self, event: &Event) {
        match event {
            Event::RecipeFetched {
                identifier,
                versions,
            } => self.resolved.push((identifier.clone(), *versions)),
            Event::Candidate(identifier) => self.candidates.push(identifier.clone()),
            Event::Finished { summary } => self.finished = Some(summary.clone()),
            Event::FetchStarted { .. } | Event::FileRead { .. } | Event::Notice(_) => {}
        }
    }

    fn render(&self) -> Component {
        let mut sections = Vec::new();

        if !self.resolved.is_empty() {
            sections.push(Component::text("Resolved:"));
            sections.push(Component::list(self.resolved.iter().map(
                |(identifier, versions)| {
                    let noun = if *versions == 1 { "version" } else { "versions" };
                    Component::text(format!("{identifier} ({versions} {noun})"))
                },
            )));
        }

        if !self.candidates.is_empty() {
            sections.push(Component::text("Found:"));
            sections.push(Component::list(
                self.candidates
                    .iter()
                    .map(|identifier| Component::colored(identifier.encode(), Color::Cyan)),
            ));
        }

        if let Some(summary) = &self.finished {
            sections.push(Component::colored(summary.clone(), Color::Green));
        }

        Component::stack(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RecipeIdentifier {
        RecipeIdentifier::parse(s).unwrap()
    }

    #[test]
    fn test_summary_lists_results() {
        let mut view = SummaryView::new();
        assert!(view.render().is_empty());

        view.apply(&Event::RecipeFetched {
            identifier: id("boost/core"),
            versions: 2,
        });
        view.apply(&Event::RecipeFetched {
            identifier: id("zlib/zlib"),
            versions: 1,
        });
        view.apply(&Event::Finished {
            summary: "Resolved 2 recipes".to_string(),
        });

        assert_eq!(
            view.render().render(80),
            "Resolved:\n• boost/core (2 versions)\n• zlib/zlib (1 version)\nResolved 2 recipes"
        );
    }

    #[test]
    fn test_summary_lists_candidates() {
        let mut view = SummaryView::new();
        view.apply(&Event::Candidate(id("a/x")));
        view.apply(&Event::Candidate(id("b/x")));
        assert_eq!(view.render().render(80), "Found:\n• a/x\n• b/x");
    }
}
