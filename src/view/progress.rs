// src/view/progress.rs

use super::{Color, Component, Projection};
use crate::event::Event;
use crate::identifier::{Identifier, RecipeIdentifier};

/// Operations currently in flight, in the order they started
#[derive(Debug, Default)]
pub struct ProgressView {
    in_flight: Vec<(RecipeIdentifier, Identifier)>,
    status: Option<String>,
    finished: bool,
}

impl ProgressView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Projection for ProgressView {
    fn apply(&mut self, event: &Event) {
        match event {
            Event::FetchStarted { identifier, source } => {
                self.in_flight.push((identifier.clone(), source.clone()));
            }
            Event::RecipeFetched { identifier, .. } => {
                if let Some(index) = self.in_flight.iter().position(|(id, _)| id == identifier) {
                    self.in_flight.remove(index);
                }
            }
            Event::Notice(message) => self.status = Some(message.clone()),
            Event::FileRead { .. } | Event::Candidate(_) | Event::Finished { .. } => {}
        }
    }

    fn render(&self) -> Component {
        if self.finished {
            return Component::empty();
        }

        let fetching = self.in_flight.iter().map(|(identifier, source)| {
            Component::colored(format!("Fetching {identifier} from {source}..."), Color::Cyan)
        });
        let status = self
            .status
            .iter()
            .map(|message| Component::colored(message.clone(), Color::Dim));

        Component::stack(fetching.chain(status))
    }

    /// Nothing is in flight once the routine is over
    fn finish(&mut self) {
        self.finished = true;
        self.in_flight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RecipeIdentifier {
        RecipeIdentifier::parse(s).unwrap()
    }

    fn started(s: &str) -> Event {
        Event::FetchStarted {
            identifier: id(s),
            source: Identifier::parse("official").unwrap(),
        }
    }

    #[test]
    fn test_tracks_in_flight_fetches() {
        let mut view = ProgressView::new();
        assert!(view.render().is_empty());

        view.apply(&started("boost/core"));
        view.apply(&started("zlib/zlib"));
        assert_eq!(
            view.render().render(80),
            "Fetching boost/core from official...\nFetching zlib/zlib from official..."
        );

        view.apply(&Event::RecipeFetched {
            identifier: id("boost/core"),
            versions: 2,
        });
        assert_eq!(view.render().render(80), "Fetching zlib/zlib from official...");
    }

    #[test]
    fn test_status_line_and_finish() {
        let mut view = ProgressView::new();
        view.apply(&Event::notice("Searching official..."));
        assert_eq!(view.render().render(80), "Searching official...");

        view.apply(&started("a/x"));
        view.finish();
        assert!(view.render().is_empty());
    }
}
