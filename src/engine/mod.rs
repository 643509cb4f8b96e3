// src/engine/mod.rs

//! Async execution engine.
//!
//! - [`runtime`] drives the pure [`Scheduler`](crate::dag::Scheduler) over a
//!   Tokio `JoinSet`, running every ready task concurrently and feeding each
//!   task the results of its declared dependencies.
//! - [`queue`] is a bounded-concurrency work queue for homogeneous jobs where
//!   a failing job never aborts the batch.

pub mod queue;
pub mod runtime;

/// Outcome of a task body for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
}

pub use crate::dag::TaskName;
pub use queue::{QueueDrained, QueueHandle, WorkQueue};
pub use runtime::{execute, Runtime, TaskResults};
