// src/dag/scheduler.rs

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::dag::graph::DagGraph;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::state_manager::StateManager;
use crate::dag::task_info::{RunState, TaskInfo};
use crate::dag::TaskName;
use crate::engine::TaskOutcome;

/// Scheduler holds the immutable DAG plus mutable per-run state.
///
/// It is a pure state machine (no Tokio, no IO) responsible for:
/// - tracking the unmet dependencies of every task
/// - deciding when a task is "ready" to run (no unmet dependencies)
/// - marking tasks as succeeded/failed
/// - blocking dependents when a task fails
/// - refusing to start anything new once a failure has been observed
#[derive(Debug)]
pub struct Scheduler {
    graph: DagGraph,
    tasks: HashMap<TaskName, TaskInfo>,
    started: bool,
    /// First task that failed in this run, if any.
    first_failure: Option<TaskName>,
    finished: bool,
}

impl Scheduler {
    pub fn new(graph: DagGraph) -> Self {
        let tasks = graph
            .tasks()
            .map(|name| {
                let deps = graph.dependencies_of(name).to_vec();
                (name.to_string(), TaskInfo::new(name.to_string(), deps))
            })
            .collect();

        Self {
            graph,
            tasks,
            started: false,
            first_failure: None,
            finished: false,
        }
    }

    /// Task names in topological order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.graph.tasks()
    }

    /// Direct dependencies of a task.
    pub fn dependencies_of(&self, task: &str) -> &[TaskName] {
        self.graph.dependencies_of(task)
    }

    /// Current run state of a task, or `None` for an unknown name.
    pub fn run_state_of(&self, task: &str) -> Option<RunState> {
        self.tasks.get(task).map(|info| info.run_state)
    }

    /// Dependencies of `task` that have not yet completed successfully.
    ///
    /// Returns `None` if the task is unknown.
    pub fn unmet_dependencies(&self, task: &str) -> Option<Vec<TaskName>> {
        let info = self.tasks.get(task)?;
        let mut unmet: Vec<TaskName> = info.unmet.iter().cloned().collect();
        unmet.sort();
        Some(unmet)
    }

    /// Names of tasks currently marked `Running`.
    pub fn running_tasks(&self) -> Vec<TaskName> {
        self.graph
            .tasks()
            .filter(|name| self.run_state_of(name) == Some(RunState::Running))
            .map(str::to_string)
            .collect()
    }

    /// Name of the first task that failed, if any.
    pub fn first_failure(&self) -> Option<&str> {
        self.first_failure.as_deref()
    }

    pub fn has_failed(&self) -> bool {
        self.first_failure.is_some()
    }

    /// Whether no further task will be started in this run.
    ///
    /// True once every task is terminal, or as soon as a failure halted the
    /// run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Start the run: every task without dependencies becomes `Running`.
    ///
    /// Calling `start` twice is a no-op for the second call.
    pub fn start(&mut self) -> SchedulerStep {
        if self.started {
            warn!("scheduler: start called on a run that is already started; ignoring");
            return SchedulerStep::default();
        }
        self.started = true;

        debug!(tasks = self.tasks.len(), "scheduler: starting graph run");

        let mut manager = StateManager::new(&self.graph, &mut self.tasks);
        let newly_scheduled = manager.collect_new_ready_tasks();
        let run_just_finished = self.maybe_finish_run();

        SchedulerStep {
            newly_scheduled,
            newly_failed: Vec::new(),
            run_just_finished,
        }
    }

    /// Handle completion of a running task with a concrete outcome.
    pub fn handle_completion(&mut self, task: &str, outcome: TaskOutcome) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        let Some(info) = self.tasks.get_mut(task) else {
            warn!(task = %task, "completion for unknown task; ignoring");
            return step;
        };

        if info.run_state != RunState::Running {
            warn!(
                task = %task,
                state = ?info.run_state,
                "completion for task that is not running; ignoring"
            );
            return step;
        }

        match outcome {
            TaskOutcome::Success => {
                info.run_state = RunState::DoneSuccess;
                debug!(task = %task, "task completed successfully");

                let halted = self.first_failure.is_some();
                let mut manager = StateManager::new(&self.graph, &mut self.tasks);
                manager.satisfy_dependents(task);
                if halted {
                    debug!(
                        task = %task,
                        "run already failed; not scheduling dependents"
                    );
                } else {
                    step.newly_scheduled = manager.collect_new_ready_tasks();
                }
            }
            TaskOutcome::Failed => {
                info.run_state = RunState::DoneFailed;
                warn!(task = %task, "task failed; blocking dependents and halting run");
                step.newly_failed.push(task.to_string());

                if self.first_failure.is_none() {
                    self.first_failure = Some(task.to_string());
                }

                let mut manager = StateManager::new(&self.graph, &mut self.tasks);
                step.newly_failed.extend(manager.mark_dependents_blocked(task));
            }
        }

        step.run_just_finished = self.maybe_finish_run();
        step
    }

    /// Mark the run finished once nothing more will be started.
    ///
    /// Returns `true` if this call transitioned the run to finished.
    fn maybe_finish_run(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let manager = StateManager::new(&self.graph, &mut self.tasks);
        if manager.all_tasks_terminal() || self.first_failure.is_some() {
            info!(
                failed = ?self.first_failure,
                "scheduler: no further tasks will start; run finished"
            );
            self.finished = true;
            true
        } else {
            false
        }
    }
}
