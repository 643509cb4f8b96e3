// src/dag/task_info.rs

//! Per-task run state.

use std::collections::HashSet;

use crate::dag::TaskName;

/// State of a task within a single graph run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting on at least one unmet dependency (or on the run to start).
    Pending,
    /// Handed to the runtime and currently executing.
    Running,
    /// Completed successfully; its result is recorded.
    DoneSuccess,
    /// The task itself failed.
    DoneFailed,
    /// Never started because an upstream task failed.
    Blocked,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::DoneSuccess | RunState::DoneFailed | RunState::Blocked
        )
    }
}

/// Static task information plus per-run state.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: TaskName,
    /// Direct dependencies, as declared.
    pub deps: Vec<TaskName>,
    /// Dependencies that have not yet completed successfully in this run.
    pub unmet: HashSet<TaskName>,
    pub run_state: RunState,
}

impl TaskInfo {
    pub fn new(name: TaskName, deps: Vec<TaskName>) -> Self {
        let unmet = deps.iter().cloned().collect();
        Self {
            name,
            deps,
            unmet,
            run_state: RunState::Pending,
        }
    }

    /// Pending with every dependency satisfied.
    pub fn is_ready(&self) -> bool {
        self.run_state == RunState::Pending && self.unmet.is_empty()
    }
}
