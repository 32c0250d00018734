// src/pipeline/mod.rs

//! Render pipeline
//!
//! Turns a routine's event stream into terminal frames:
//!
//! 1. A driver task (on the I/O runtime) pulls the routine and fans every
//!    event out to the progress, stats and summary projections. The first
//!    failure is sent on a separate channel instead, and the driver stops.
//! 2. Each projection runs as its own task (on the compute runtime) and
//!    keeps its latest rendering in a last-value slot.
//! 3. A [`FrameSampler`] reads all slots once per sample interval and
//!    yields the stacked frame when it changed.
//! 4. The caller's loop paints frames until the sampler is exhausted, or
//!    switches to the error panel as soon as a failure arrives. Frames are
//!    never painted after a failure.

mod failure;
mod sampler;

pub use failure::{DIAGNOSTICS_FILE, MAX_SUGGESTIONS, diagnostic_record, error_panel, write_diagnostics};
pub use sampler::{FrameSampler, SlotWriter, frame_slot};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::executor::Executors;
use crate::terminal::FrameSink;
use crate::view::{Component, ProgressView, Projection, StatsView, SummaryView};
use futures::StreamExt;
use futures::stream::BoxStream;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Event stream produced by a command
pub type Routine = BoxStream<'static, Result<Event>>;

#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Time between frame samples
    pub sample_interval: Duration,
    /// Stats are not shown before this much time has passed
    pub stats_warmup: Duration,
    /// Width of normal frames
    pub width: usize,
    /// Width of the error panel
    pub error_width: usize,
    pub diagnostics_path: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(100),
            stats_warmup: Duration::from_millis(300),
            width: 80,
            error_width: 60,
            diagnostics_path: PathBuf::from(DIAGNOSTICS_FILE),
        }
    }
}

/// How the routine ended
#[derive(Debug)]
pub enum Outcome {
    /// Every event was painted
    Completed,
    /// The routine failed and the error panel was painted
    Failed(Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// When a projection publishes its rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// After every event
    Continuous,
    /// After every event, once the warm-up has elapsed
    AfterWarmup(Duration),
    /// Only when the event stream has ended
    AtEnd,
}

/// Run a routine to completion, painting its frames into `sink`
///
/// Returns once the final frame (or the error panel) has been painted and
/// the sink finished.
pub async fn run(
    routine: Routine,
    sink: &mut dyn FrameSink,
    settings: &RenderSettings,
    executors: &Executors,
) -> Outcome {
    let (failure_tx, mut failure_rx) = oneshot::channel();

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (stats_tx, stats_rx) = mpsc::unbounded_channel();
    let (summary_tx, summary_rx) = mpsc::unbounded_channel();

    let (progress_slot, progress_frame) = frame_slot();
    let (stats_slot, stats_frame) = frame_slot();
    let (summary_slot, summary_frame) = frame_slot();

    let driver = executors.io.spawn(drive_routine(
        routine,
        vec![progress_tx, stats_tx, summary_tx],
        failure_tx,
    ));

    let projections: Vec<JoinHandle<()>> = vec![
        executors.compute.spawn(run_projection(
            ProgressView::new(),
            progress_rx,
            progress_slot,
            Emission::Continuous,
        )),
        executors.compute.spawn(run_projection(
            StatsView::new(),
            stats_rx,
            stats_slot,
            Emission::AfterWarmup(settings.stats_warmup),
        )),
        executors.compute.spawn(run_projection(
            SummaryView::new(),
            summary_rx,
            summary_slot,
            Emission::AtEnd,
        )),
    ];

    let mut sampler = FrameSampler::new(
        vec![progress_frame, stats_frame, summary_frame],
        settings.sample_interval,
    );
    let mut failure_pending = true;

    let outcome = loop {
        let next = tokio::select! {
            biased;
            failure = &mut failure_rx, if failure_pending => Next::Failure(failure.ok()),
            frame = sampler.next_frame() => Next::Frame(frame),
        };

        match next {
            Next::Failure(Some(error)) => {
                debug!("Routine failed, cutting off frames: {}", error);
                for projection in &projections {
                    projection.abort();
                }
                let panel = error_panel(&error, &settings.diagnostics_path).await;
                paint(sink, &panel, settings.error_width);
                break Outcome::Failed(error);
            }
            // The driver finished without failing
            Next::Failure(None) => failure_pending = false,
            Next::Frame(Some(frame)) => paint(sink, &frame, settings.width),
            Next::Frame(None) => break Outcome::Completed,
        }
    };

    driver.abort();
    sink.finish();
    info!("Routine {}", if outcome.is_success() { "completed" } else { "failed" });
    outcome
}

enum Next {
    Failure(Option<Error>),
    Frame(Option<Component>),
}

fn paint(sink: &mut dyn FrameSink, frame: &Component, width: usize) {
    let text = if sink.styled() {
        frame.render_styled(width)
    } else {
        frame.render(width)
    };
    sink.flip(&text);
}

/// Pull the routine, copying each event to every outlet
///
/// Stops at the first failure, which goes to `failure` instead. Dropping
/// the outlets afterwards tells the projections the stream is over.
async fn drive_routine(
    mut routine: Routine,
    outlets: Vec<mpsc::UnboundedSender<Event>>,
    failure: oneshot::Sender<Error>,
) {
    while let Some(item) = routine.next().await {
        match item {
            Ok(event) => {
                for outlet in &outlets {
                    // A projection that was aborted no longer listens
                    let _ = outlet.send(event.clone());
                }
            }
            Err(error) => {
                let _ = failure.send(error);
                return;
            }
        }
    }
}

/// Fold events into a projection and publish its rendering to `slot`
pub async fn run_projection<P: Projection>(
    mut projection: P,
    mut events: mpsc::UnboundedReceiver<Event>,
    slot: SlotWriter,
    emission: Emission,
) {
    let publish = |projection: &P| {
        let frame = projection.render();
        slot.send_if_modified(|current| {
            if *current == frame {
                false
            } else {
                *current = frame;
                true
            }
        });
    };

    match emission {
        Emission::Continuous => {
            while let Some(event) = events.recv().await {
                projection.apply(&event);
                publish(&projection);
            }
        }
        Emission::AfterWarmup(warmup) => {
            let warm = tokio::time::sleep(warmup);
            tokio::pin!(warm);
            let mut warmed = false;
            loop {
                tokio::select! {
                    _ = &mut warm, if !warmed => {
                        warmed = true;
                        publish(&projection);
                    }
                    event = events.recv() => match event {
                        Some(event) => {
                            projection.apply(&event);
                            if warmed {
                                publish(&projection);
                            }
                        }
                        None => break,
                    },
                }
            }
        }
        Emission::AtEnd => {
            while let Some(event) = events.recv().await {
                projection.apply(&event);
            }
        }
    }

    projection.finish();
    publish(&projection);
}
