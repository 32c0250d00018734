// src/executor.rs

//! Runtimes for fetch work and render work
//!
//! Fetches and other I/O run on a runtime whose thread count bounds the
//! number of concurrent filesystem and network operations. Projections and
//! rendering run on a separate runtime so neither side can starve the other.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

/// Default number of I/O threads
pub const DEFAULT_IO_THREADS: usize = 10;

/// A dependent fetch may wait on another fetch queued on the same pool
pub const MIN_IO_THREADS: usize = 2;

const MAX_COMPUTE_THREADS: usize = 4;

/// Where the pipeline spawns its tasks
#[derive(Debug, Clone)]
pub struct Executors {
    pub io: Handle,
    pub compute: Handle,
}

impl Executors {
    /// Run everything on the runtime of the caller
    ///
    /// Panics outside of a tokio runtime.
    pub fn current() -> Self {
        let handle = Handle::current();
        Self {
            io: handle.clone(),
            compute: handle,
        }
    }
}

/// The two owned runtimes of the binary
pub struct WorkerPools {
    io: Runtime,
    compute: Runtime,
    io_threads: usize,
}

impl WorkerPools {
    /// Build the runtimes; `io_threads` is raised to [`MIN_IO_THREADS`]
    pub fn new(io_threads: usize) -> Result<Self> {
        let io_threads = io_threads.max(MIN_IO_THREADS);
        let compute_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, MAX_COMPUTE_THREADS);

        let io = Builder::new_multi_thread()
            .worker_threads(io_threads)
            .max_blocking_threads(io_threads)
            .thread_name("buckaroo-io")
            .enable_all()
            .build()?;

        let compute = Builder::new_multi_thread()
            .worker_threads(compute_threads)
            .thread_name("buckaroo-compute")
            .enable_all()
            .build()?;

        debug!(
            "Started worker pools: {} I/O threads, {} compute threads",
            io_threads, compute_threads
        );

        Ok(Self {
            io,
            compute,
            io_threads,
        })
    }

    pub fn io_threads(&self) -> usize {
        self.io_threads
    }

    pub fn executors(&self) -> Executors {
        Executors {
            io: self.io.handle().clone(),
            compute: self.compute.handle().clone(),
        }
    }

    /// Drive a future to completion on the I/O runtime
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.io.block_on(future)
    }

    /// Stop both runtimes, waiting at most `timeout` for each
    pub fn shutdown(self, timeout: Duration) {
        self.compute.shutdown_timeout(timeout);
        self.io.shutdown_timeout(timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Process;

    #[test]
    fn test_io_threads_have_a_floor() {
        let pools = WorkerPools::new(1).unwrap();
        assert_eq!(pools.io_threads(), MIN_IO_THREADS);
        pools.shutdown(Duration::from_secs(1));

        let pools = WorkerPools::new(DEFAULT_IO_THREADS).unwrap();
        assert_eq!(pools.io_threads(), DEFAULT_IO_THREADS);
        pools.shutdown(Duration::from_secs(1));
    }

    #[test]
    fn test_dependent_work_completes_on_smallest_pool() {
        let pools = WorkerPools::new(MIN_IO_THREADS).unwrap();

        // Each chain waits on its prerequisite; more chains than threads
        let chains: Vec<Process<(), u32>> = (0..8)
            .map(|n| {
                Process::<(), u32>::ready(n).and_then(|prerequisite| {
                    Process::of(move || async move {
                        tokio::task::spawn(async move { prerequisite * 2 })
                            .await
                            .map_err(Into::into)
                    })
                })
            })
            .collect();

        let results = pools.block_on(async {
            tokio::time::timeout(Duration::from_secs(5), Process::join_all(chains).result()).await
        });
        assert_eq!(results.unwrap().unwrap(), vec![0, 2, 4, 6, 8, 10, 12, 14]);
        pools.shutdown(Duration::from_secs(1));
    }

    #[test]
    fn test_executors_spawn_on_separate_runtimes() {
        let pools = WorkerPools::new(2).unwrap();
        let executors = pools.executors();

        let io_thread = pools
            .block_on(executors.io.spawn(async { std::thread::current().name().map(str::to_string) }))
            .unwrap();
        let compute_thread = pools
            .block_on(executors.compute.spawn(async {
                std::thread::current().name().map(str::to_string)
            }))
            .unwrap();

        assert_eq!(io_thread.as_deref(), Some("buckaroo-io"));
        assert_eq!(compute_thread.as_deref(), Some("buckaroo-compute"));
        pools.shutdown(Duration::from_secs(1));
    }
}
