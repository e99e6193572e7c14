//! # Task Management System
//!
//! Owns the worker threads of the chunk pipeline.
//!
//! ## Architecture Overview
//! - `TaskManager`: spawns one named thread per [`Task`] and shares a running flag
//!   with all of them
//! - `Task`: a pipeline stage polled in a loop on its worker thread
//! - `PipelineQueues`: the channels connecting the stages (load → rebuild → upload,
//!   plus the per-chunk block-update batches)
//! - `PipelineStats`: lock-free counters describing pipeline throughput
//!
//! ## Task Lifecycle
//! 1. A task is handed to `TaskManager::spawn` and moved onto a new thread
//! 2. The thread calls `process_next` with the poll interval until the running flag clears
//! 3. `TaskManager::shutdown` (or drop) clears the flag and joins every thread
//!
//! Because every blocking wait inside a task is bounded by the poll interval, shutdown
//! completes within about one interval plus the longest unit of work in flight.
//!
//! ## Example Usage
//! ```rust
//! use std::time::Duration;
//! use voxel_stream::engine_state::task_management::{
//!     task::{Task, TaskOutcome},
//!     TaskManager,
//! };
//!
//! struct Idle;
//! impl Task for Idle {
//!     fn name(&self) -> &str { "idle" }
//!     fn process_next(&mut self, timeout: Duration) -> TaskOutcome {
//!         std::thread::sleep(timeout);
//!         TaskOutcome::Idle
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(Duration::from_millis(1));
//! task_manager.spawn(Box::new(Idle)).unwrap();
//! task_manager.shutdown();
//! ```

pub mod pipeline;
pub mod task;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::info;
use task::Task;

use crate::error::EngineError;

/// A running worker thread.
#[derive(Debug)]
struct Worker {
    name: String,
    handle: JoinHandle<()>,
}

/// Manages the pool of pipeline worker threads.
///
/// # Implementation Notes
/// - Drop-safe: dropping the manager stops and joins every worker
/// - Panic-safe: a panicking worker is reported at join time, the others still stop cleanly
pub struct TaskManager {
    workers: Vec<Worker>,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl TaskManager {
    /// Creates a manager whose workers wait at most `poll_interval` per poll.
    pub fn new(poll_interval: Duration) -> Self {
        TaskManager {
            workers: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
            poll_interval,
        }
    }

    /// Starts `task` on a new named thread.
    ///
    /// # Errors
    /// Returns [`EngineError::WorkerSpawn`] if the OS refuses to create the thread.
    pub fn spawn(&mut self, mut task: Box<dyn Task>) -> Result<(), EngineError> {
        let name = task.name().to_string();
        let running = self.running.clone();
        let poll_interval = self.poll_interval;

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                info!("Worker {} started", task.name());
                while running.load(Ordering::Acquire) {
                    task.process_next(poll_interval);
                }
                info!("Worker {} stopped", task.name());
            })
            .map_err(|source| EngineError::WorkerSpawn {
                name: name.clone(),
                source,
            })?;

        self.workers.push(Worker { name, handle });
        Ok(())
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Signals every worker to stop and waits for all of them. Idempotent.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if self.workers.is_empty() {
            return;
        }
        info!("Stopping {} workers", self.workers.len());
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                log::error!("Worker {} panicked", worker.name);
            }
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use task::TaskOutcome;

    struct Counter {
        count: Arc<AtomicUsize>,
    }

    impl Task for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn process_next(&mut self, timeout: Duration) -> TaskOutcome {
            self.count.fetch_add(1, Ordering::Relaxed);
            thread::sleep(timeout);
            TaskOutcome::Processed
        }
    }

    struct Panics;

    impl Task for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn process_next(&mut self, _timeout: Duration) -> TaskOutcome {
            panic!("boom");
        }
    }

    #[test]
    fn workers_run_until_shutdown() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(Duration::from_millis(1));
        for _ in 0..2 {
            manager
                .spawn(Box::new(Counter {
                    count: count.clone(),
                }))
                .unwrap();
        }
        assert_eq!(manager.num_workers(), 2);

        while count.load(Ordering::Relaxed) < 10 {
            thread::sleep(Duration::from_millis(1));
        }
        manager.shutdown();
        assert!(!manager.is_running());
        assert_eq!(manager.num_workers(), 0);

        let after = count.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::Relaxed), after);
    }

    #[test]
    fn panicking_worker_does_not_block_shutdown() {
        let mut manager = TaskManager::new(Duration::from_millis(1));
        manager.spawn(Box::new(Panics)).unwrap();
        thread::sleep(Duration::from_millis(10));
        manager.shutdown();
        manager.shutdown();
        assert_eq!(manager.num_workers(), 0);
    }
}
