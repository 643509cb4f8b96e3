// src/dag/mod.rs

//! Task graph representation and scheduling.
//!
//! - [`task`] declares tasks (name, dependencies, body) and builds a
//!   validated [`TaskGraph`].
//! - [`graph`] holds the dependency/dependent adjacency of a validated graph.
//! - [`scheduler`] contains the per-run state machine that decides which
//!   tasks are ready to run, and when dependents can be started.
//! - [`task_info`] provides per-task run state.
//! - [`scheduler_step`] defines the result type for scheduler steps.
//! - [`state_manager`] manages per-run state transitions.

pub mod graph;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task;
pub mod task_info;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

pub use graph::DagGraph;
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use task::{TaskFn, TaskFuture, TaskGraph, TaskGraphBuilder, TaskInputs};
pub use task_info::RunState;
