//! # Task System Core Traits
//!
//! A `Task` is a long-running pipeline stage. The `TaskManager` gives each task its own
//! thread and calls [`Task::process_next`] in a loop until shutdown.
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved onto its worker thread
//! - Everything a task shares with other threads must be synchronised (channels,
//!   `MtResource`, atomics)

use std::time::Duration;

/// What one call to [`Task::process_next`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// A unit of work was completed.
    Processed,
    /// Work was taken but handed back because a downstream stage is saturated.
    Requeued,
    /// Nothing arrived before the timeout.
    Idle,
}

/// One stage of the chunk pipeline, run continuously on a dedicated worker thread.
pub trait Task: Send {
    /// Thread name used for logging and debugging.
    fn name(&self) -> &str;

    /// Waits at most `timeout` for one unit of work and processes it.
    ///
    /// Implementations must return within roughly `timeout` when idle so the worker
    /// can notice shutdown.
    fn process_next(&mut self, timeout: Duration) -> TaskOutcome;
}
