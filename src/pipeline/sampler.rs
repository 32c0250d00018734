// src/pipeline/sampler.rs

//! Fixed-rate frame sampling over last-value slots
//!
//! Every projection owns the sending half of a [`watch`] channel and keeps
//! its latest rendering there. The sampler wakes once per period, stacks
//! the current value of every slot into one frame and hands it out only if
//! it differs from the frame handed out before.

use crate::view::Component;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Writer side of a projection slot
pub type SlotWriter = watch::Sender<Component>;

/// A slot that starts out holding the empty component
pub fn frame_slot() -> (SlotWriter, watch::Receiver<Component>) {
    watch::channel(Component::empty())
}

pub struct FrameSampler {
    slots: Vec<watch::Receiver<Component>>,
    ticker: Interval,
    last: Option<Component>,
    exhausted: bool,
}

impl FrameSampler {
    /// Sample `slots`, top to bottom, every `period`
    ///
    /// The first sample is taken one period after construction.
    pub fn new(slots: Vec<watch::Receiver<Component>>, period: Duration) -> Self {
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            slots,
            ticker,
            last: Some(Component::empty()),
            exhausted: false,
        }
    }

    /// Wait for the next frame that differs from the previous one
    ///
    /// Nothing has been painted initially, so an all-empty frame is only
    /// handed out after something else was.
    ///
    /// Returns `None` after every writer is gone and their final values
    /// have been sampled. Cancel safe.
    pub async fn next_frame(&mut self) -> Option<Component> {
        while !self.exhausted {
            self.ticker.tick().await;

            // Checked before reading so a value written just before closing
            // is still part of the trailing frame
            self.exhausted = self.slots.iter().all(|slot| slot.has_changed().is_err());

            let frame = Component::stack(self.slots.iter().map(|slot| slot.borrow().clone()));
            if self.last.as_ref() != Some(&frame) {
                self.last = Some(frame.clone());
                return Some(frame);
            }
        }
        None
    }
}
