// src/process.rs

//! Progress-emitting computations
//!
//! A [`Process`] is a cold description of work: nothing runs until
//! [`Process::start`] is called, and every call starts the work afresh.
//! While running, the work reports progress events of type `E` through an
//! [`Emitter`]; it then terminates with exactly one success value `T` or
//! one [`Error`].
//!
//! # Example
//!
//! ```ignore
//! let fetch = Process::new(|emitter| async move {
//!     emitter.emit(Event::notice("reading"));
//!     Ok(42)
//! });
//!
//! let doubled = fetch.map(|n| n * 2);
//! assert_eq!(doubled.result().await?, 84);
//! ```
//!
//! Processes never retry; wrap construction in a retry loop at the call
//! site if needed.

use crate::error::{Error, Result};
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// One element of a running process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<E, T> {
    /// Intermediate progress
    Progress(E),
    /// Terminal success; nothing follows it
    Done(T),
}

/// Handle through which running work reports progress
pub struct Emitter<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Emitter<E> {
    /// An emitter whose events go nowhere
    pub fn discard() -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        Self { tx }
    }

    pub fn emit(&self, event: E) {
        // A consumer that stopped listening is not an error for the producer
        let _ = self.tx.send(event);
    }
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

type Factory<E, T> = dyn Fn(Emitter<E>) -> BoxFuture<'static, Result<T>> + Send + Sync;

/// A cold, restartable, progress-emitting computation
pub struct Process<E, T> {
    factory: Arc<Factory<E, T>>,
}

impl<E, T> Clone for Process<E, T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

enum Run<E, T> {
    Running {
        work: BoxFuture<'static, Result<T>>,
        rx: mpsc::UnboundedReceiver<E>,
    },
    Draining {
        rx: mpsc::UnboundedReceiver<E>,
        outcome: Result<T>,
    },
    Finished,
}

enum Polled<E, T> {
    Event(E),
    Completed(Result<T>),
}

impl<E, T> Process<E, T>
where
    E: Send + 'static,
    T: Send + 'static,
{
    /// Build a process from a factory that is invoked once per start
    pub fn new<F, Fut>(work: F) -> Self
    where
        F: Fn(Emitter<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move |emitter| work(emitter).boxed()),
        }
    }

    /// A process that reports no progress
    pub fn of<F, Fut>(work: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::new(move |_| work())
    }

    /// A process that succeeds immediately
    pub fn ready(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move |_| future::ready(Ok(value.clone())))
    }

    /// A process that fails immediately with a freshly built error
    pub fn failed<F>(error: F) -> Self
    where
        F: Fn() -> Error + Send + Sync + 'static,
    {
        Self::new(move |_| future::ready(Err(error())))
    }

    /// Start the work and observe it as a stream
    ///
    /// The stream yields progress in emission order and ends right after
    /// the first `Done` or `Err` element. Events emitted before the work
    /// returned are always delivered before the terminal element.
    pub fn start(&self) -> BoxStream<'static, Result<Step<E, T>>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let work = (self.factory)(Emitter { tx });

        stream::unfold(Run::Running { work, rx }, |state| async move {
            match state {
                Run::Running { mut work, mut rx } => {
                    let polled = tokio::select! {
                        biased;
                        Some(event) = rx.recv() => Polled::Event(event),
                        outcome = &mut work => Polled::Completed(outcome),
                    };
                    match polled {
                        Polled::Event(event) => {
                            Some((Ok(Step::Progress(event)), Run::Running { work, rx }))
                        }
                        Polled::Completed(outcome) => drain(rx, outcome),
                    }
                }
                Run::Draining { rx, outcome } => drain(rx, outcome),
                Run::Finished => None,
            }
        })
        .boxed()
    }

    /// Run the work, re-emitting its progress through `emitter`
    pub async fn forward(&self, emitter: &Emitter<E>) -> Result<T> {
        let mut steps = self.start();
        while let Some(step) = steps.next().await {
            match step? {
                Step::Progress(event) => emitter.emit(event),
                Step::Done(value) => return Ok(value),
            }
        }
        Err(Error::Incomplete)
    }

    /// Run the work, ignoring progress
    pub async fn result(&self) -> Result<T> {
        self.forward(&Emitter::discard()).await
    }

    /// Transform the success value
    pub fn map<U, F>(self, f: F) -> Process<E, U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Process::new(move |emitter| {
            let inner = self.clone();
            let f = Arc::clone(&f);
            async move { inner.forward(&emitter).await.map(|value| (*f)(value)) }
        })
    }

    /// Chain a dependent process that starts after this one succeeds
    pub fn and_then<U, F>(self, next: F) -> Process<E, U>
    where
        U: Send + 'static,
        F: Fn(T) -> Process<E, U> + Send + Sync + 'static,
    {
        let next = Arc::new(next);
        Process::new(move |emitter| {
            let inner = self.clone();
            let next = Arc::clone(&next);
            async move {
                let value = inner.forward(&emitter).await?;
                (*next)(value).forward(&emitter).await
            }
        })
    }

    /// Run two processes concurrently and pair their results
    ///
    /// Fails with the first error; the other side is dropped at that point.
    pub fn zip<U>(self, other: Process<E, U>) -> Process<E, (T, U)>
    where
        U: Send + 'static,
    {
        Process::new(move |emitter| {
            let left = self.clone();
            let right = other.clone();
            async move { future::try_join(left.forward(&emitter), right.forward(&emitter)).await }
        })
    }

    /// Run many processes in parallel, collecting results in input order
    ///
    /// Each process is spawned onto the current runtime. The first failure
    /// aborts every sibling that is still running.
    pub fn join_all<I>(processes: I) -> Process<E, Vec<T>>
    where
        I: IntoIterator<Item = Process<E, T>>,
    {
        let processes: Arc<[Process<E, T>]> = processes.into_iter().collect::<Vec<_>>().into();
        Process::new(move |emitter| {
            let processes = Arc::clone(&processes);
            async move {
                let mut running = JoinSet::new();
                for (index, process) in processes.iter().cloned().enumerate() {
                    let emitter = emitter.clone();
                    running.spawn(async move { (index, process.forward(&emitter).await) });
                }

                let mut results: Vec<Option<T>> = processes.iter().map(|_| None).collect();
                while let Some(joined) = running.join_next().await {
                    let (index, outcome) = joined?;
                    // Returning early drops the JoinSet, which aborts the rest
                    results[index] = Some(outcome?);
                }

                results
                    .into_iter()
                    .map(|result| result.ok_or(Error::Incomplete))
                    .collect()
            }
        })
    }

    /// Start the work as an event stream, turning the result into a final event
    pub fn events<F>(self, finish: F) -> BoxStream<'static, Result<E>>
    where
        F: Fn(T) -> E + Send + 'static,
    {
        self.start()
            .map(move |step| match step {
                Ok(Step::Progress(event)) => Ok(event),
                Ok(Step::Done(value)) => Ok(finish(value)),
                Err(error) => Err(error),
            })
            .boxed()
    }
}

type Drained<E, T> = Option<(Result<Step<E, T>>, Run<E, T>)>;

fn drain<E, T>(mut rx: mpsc::UnboundedReceiver<E>, outcome: Result<T>) -> Drained<E, T> {
    match rx.try_recv() {
        Ok(event) => Some((Ok(Step::Progress(event)), Run::Draining { rx, outcome })),
        Err(_) => Some((outcome.map(Step::Done), Run::Finished)),
    }
}
