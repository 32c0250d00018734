// src/view/mod.rs

//! What the terminal shows while a routine runs
//!
//! Each projection folds the routine's events into its own state and
//! renders that state as a [`Component`]:
//! - [`ProgressView`]: operations currently in flight
//! - [`StatsView`]: aggregate counters
//! - [`SummaryView`]: what the routine produced, shown once it ends
//!
//! Projections start out rendering [`Component::empty`], so a frame can be
//! assembled from them before any event has arrived.

mod component;
mod progress;
mod stats;
mod summary;

pub use component::{Color, Component};
pub use progress::ProgressView;
pub use stats::StatsView;
pub use summary::SummaryView;

use crate::event::Event;

/// A fold over the event stream that can be rendered at any point
pub trait Projection: Send + 'static {
    /// Fold one event into the state
    fn apply(&mut self, event: &Event);

    /// Render the current state
    fn render(&self) -> Component;

    /// The event stream ended successfully
    fn finish(&mut self) {}
}
