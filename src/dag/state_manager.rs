// src/dag/state_manager.rs

//! Per-run state transitions for tasks in the scheduler.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::dag::task_info::{RunState, TaskInfo};
use crate::dag::{DagGraph, TaskName};

/// Manages per-run state transitions for tasks.
pub struct StateManager<'a> {
    graph: &'a DagGraph,
    tasks: &'a mut HashMap<TaskName, TaskInfo>,
}

impl<'a> StateManager<'a> {
    pub fn new(graph: &'a DagGraph, tasks: &'a mut HashMap<TaskName, TaskInfo>) -> Self {
        Self { graph, tasks }
    }

    /// Remove `done` from the unmet set of each of its direct dependents.
    pub fn satisfy_dependents(&mut self, done: &str) {
        for dependent in self.graph.dependents_of(done) {
            if let Some(info) = self.tasks.get_mut(dependent) {
                if info.unmet.remove(done) {
                    debug!(
                        task = %info.name,
                        dep = %done,
                        remaining = info.unmet.len(),
                        "dependency satisfied"
                    );
                }
            }
        }
    }

    /// Mark every pending dependent (transitively) of a failed task as
    /// `Blocked`.
    ///
    /// Returns the tasks that were newly blocked, excluding the failed task
    /// itself.
    pub fn mark_dependents_blocked(&mut self, failed_task: &str) -> Vec<TaskName> {
        let mut stack: Vec<TaskName> = self.graph.dependents_of(failed_task).to_vec();
        let mut newly_blocked = Vec::new();

        while let Some(name) = stack.pop() {
            if let Some(info) = self.tasks.get_mut(&name) {
                if info.run_state == RunState::Pending {
                    info.run_state = RunState::Blocked;
                    debug!(
                        task = %info.name,
                        upstream = %failed_task,
                        "blocking dependent due to upstream failure"
                    );
                    newly_blocked.push(info.name.clone());
                    stack.extend(self.graph.dependents_of(&name).iter().cloned());
                }
            }
        }

        newly_blocked
    }

    /// Collect tasks that are `Pending` with no unmet dependencies, mark
    /// them as `Running`, and return their names in topological order.
    pub fn collect_new_ready_tasks(&mut self) -> Vec<TaskName> {
        let mut ready = Vec::new();

        for name in self.graph.topological_order() {
            if let Some(info) = self.tasks.get_mut(name) {
                if info.is_ready() {
                    info!(task = %info.name, deps = ?info.deps, "scheduling task");
                    info.run_state = RunState::Running;
                    ready.push(info.name.clone());
                }
            }
        }

        ready
    }

    /// Check if all tasks are in a terminal state.
    pub fn all_tasks_terminal(&self) -> bool {
        self.tasks.values().all(|info| info.run_state.is_terminal())
    }
}
