//! Execution strategies for the trial loop.
//!
//! The trial engine only needs one capability: hand out disjoint ranges of
//! the output buffer to a body closure. [`ExecutionStrategy::distribute`]
//! is that capability. Each variant decides who runs which range:
//!
//! - [`Sequential`]: the calling thread runs the whole range at once.
//! - [`DataParallel`]: a fixed-size Rayon pool where every worker pulls
//!   fixed-size chunks from a shared queue until it is empty (dynamic
//!   scheduling, so fast workers take more chunks).
//! - [`TaskParallel`]: grain-sized tasks on Rayon's global work-stealing
//!   scheduler.
//!
//! Every slot is handed to exactly one body invocation, and `distribute`
//! returns only after all of them have finished.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, SimulationError};

use super::strategy::Strategy;

/// Trials per chunk claimed by a data-parallel worker.
const DATA_PARALLEL_CHUNK: usize = 1024;

/// Trials per work-stealing task.
const TASK_GRAIN: usize = 8192;

/// Body run over one contiguous range of trials.
///
/// `range` is the global trial index range; the slice holds exactly the
/// output slots for that range.
pub type TrialBody<'a> = dyn Fn(Range<usize>, &mut [f64]) + Sync + 'a;

/// A way of spreading the trial loop over threads.
pub trait ExecutionStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> Strategy;

    /// Number of threads this strategy can keep busy.
    fn concurrency(&self) -> usize;

    /// Run `body` over every slot of `slots`, each slot exactly once.
    fn distribute(&self, slots: &mut [f64], body: &TrialBody<'_>);
}

/// Single-threaded baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl ExecutionStrategy for Sequential {
    fn kind(&self) -> Strategy {
        Strategy::Sequential
    }

    fn concurrency(&self) -> usize {
        1
    }

    fn distribute(&self, slots: &mut [f64], body: &TrialBody<'_>) {
        body(0..slots.len(), slots);
    }
}

/// Fixed-size worker pool with a shared chunk queue.
#[derive(Debug)]
pub struct DataParallel {
    pool: rayon::ThreadPool,
    chunk_size: usize,
}

impl DataParallel {
    /// Build a pool of `max_threads` workers (0 = hardware concurrency).
    ///
    /// # Errors
    ///
    /// Returns error if the thread pool cannot be created.
    pub fn new(max_threads: usize) -> Result<Self> {
        let workers = if max_threads > 0 {
            max_threads
        } else {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("var-worker-{i}"))
            .build()
            .map_err(|e| SimulationError::ThreadPool {
                message: e.to_string(),
            })?;

        debug!(workers, "Built data-parallel worker pool");

        Ok(Self {
            pool,
            chunk_size: DATA_PARALLEL_CHUNK,
        })
    }
}

impl ExecutionStrategy for DataParallel {
    fn kind(&self) -> Strategy {
        Strategy::DataParallel
    }

    fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn distribute(&self, slots: &mut [f64], body: &TrialBody<'_>) {
        let chunk_size = self.chunk_size;
        // The iterator only hands out each chunk once; a poisoned lock still
        // holds a consistent cursor.
        let queue = Mutex::new(slots.chunks_mut(chunk_size).enumerate());
        let queue = &queue;

        self.pool.scope(|scope| {
            for worker in 0..self.pool.current_num_threads() {
                scope.spawn(move |_| {
                    let mut claimed = 0_usize;
                    loop {
                        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                        let Some((index, chunk)) = next else {
                            break;
                        };
                        let start = index * chunk_size;
                        body(start..start + chunk.len(), chunk);
                        claimed += 1;
                    }
                    debug!(worker, chunks = claimed, "Worker drained chunk queue");
                });
            }
        });
    }
}

/// Grain-sized tasks on the global work-stealing pool.
#[derive(Debug, Clone, Copy)]
pub struct TaskParallel {
    grain: usize,
}

impl Default for TaskParallel {
    fn default() -> Self {
        Self { grain: TASK_GRAIN }
    }
}

impl ExecutionStrategy for TaskParallel {
    fn kind(&self) -> Strategy {
        Strategy::TaskParallel
    }

    fn concurrency(&self) -> usize {
        rayon::current_num_threads()
    }

    fn distribute(&self, slots: &mut [f64], body: &TrialBody<'_>) {
        let grain = self.grain;
        slots
            .par_chunks_mut(grain)
            .enumerate()
            .for_each(|(index, chunk)| {
                let start = index * grain;
                body(start..start + chunk.len(), chunk);
            });
    }
}
