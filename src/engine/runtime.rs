// src/engine/runtime.rs

use std::collections::HashMap;
use std::fmt;

use anyhow::anyhow;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::dag::{Scheduler, TaskFn, TaskGraph, TaskInputs, TaskName};
use crate::engine::TaskOutcome;
use crate::errors::{PedigreeError, Result};

/// Merged results of a successful run, keyed by task name.
pub type TaskResults<T> = HashMap<TaskName, T>;

type Joined<T> = (TaskName, Result<T>);

/// Drives the [`Scheduler`] for one [`TaskGraph`] run.
///
/// The scheduler decides *what* may start; this shell owns the async side:
/// spawning task bodies onto a `JoinSet`, collecting their results, and
/// feeding completions back into the scheduler.
///
/// The first task failure ends the run with that error. Tasks that are
/// still running at that point are not cancelled: they are moved to a
/// detached drain that lets them finish, discards their results and logs
/// any failure they report.
pub struct Runtime<T> {
    scheduler: Scheduler,
    bodies: HashMap<TaskName, TaskFn<T>>,
    results: TaskResults<T>,
    in_flight: JoinSet<Joined<T>>,
    /// Tokio task id -> task name, so panics can be attributed.
    names: HashMap<Id, TaskName>,
}

impl<T> fmt::Debug for Runtime<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl<T> Runtime<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(graph: TaskGraph<T>) -> Self {
        let (dag, bodies) = graph.into_parts();
        Self {
            scheduler: Scheduler::new(dag),
            bodies,
            results: HashMap::new(),
            in_flight: JoinSet::new(),
            names: HashMap::new(),
        }
    }

    /// Run every task once, in dependency order.
    ///
    /// Returns the results of all tasks, or the error of the first task
    /// that failed.
    pub async fn run(mut self) -> Result<TaskResults<T>> {
        info!(tasks = self.bodies.len(), "task graph run started");

        let step = self.scheduler.start();
        self.spawn_ready(step.newly_scheduled);

        while let Some(joined) = self.in_flight.join_next_with_id().await {
            let (name, outcome) = match joined {
                Ok((id, (name, outcome))) => {
                    self.names.remove(&id);
                    (name, outcome)
                }
                Err(err) => {
                    let name = self.names.remove(&err.id()).unwrap_or_default();
                    let outcome = Err(join_failure(&name, &err));
                    (name, outcome)
                }
            };

            match outcome {
                Ok(value) => {
                    self.results.insert(name.clone(), value);
                    let step = self.scheduler.handle_completion(&name, TaskOutcome::Success);
                    self.spawn_ready(step.newly_scheduled);
                }
                Err(err) => {
                    let step = self.scheduler.handle_completion(&name, TaskOutcome::Failed);
                    warn!(
                        task = %name,
                        error = %err,
                        blocked = ?step.newly_failed,
                        "task failed; ending graph run"
                    );
                    self.abandon_in_flight();
                    return Err(err);
                }
            }
        }

        if !self.scheduler.is_finished() {
            return Err(PedigreeError::Other(anyhow!(
                "task graph stalled with tasks still pending"
            )));
        }

        info!(tasks = self.results.len(), "task graph run complete");
        Ok(self.results)
    }

    /// Spawn the given ready tasks, handing each its dependencies' results.
    fn spawn_ready(&mut self, ready: Vec<TaskName>) {
        for name in ready {
            let Some(body) = self.bodies.remove(&name) else {
                warn!(task = %name, "scheduled task has no body (already ran?); skipping");
                continue;
            };

            let inputs: TaskInputs<T> = self
                .scheduler
                .dependencies_of(&name)
                .iter()
                .filter_map(|dep| {
                    self.results
                        .get(dep)
                        .map(|value| (dep.clone(), value.clone()))
                })
                .collect();

            debug!(task = %name, inputs = inputs.len(), "spawning task");

            let span = info_span!("task", task = %name);
            let task_name = name.clone();
            let handle = self.in_flight.spawn(
                async move {
                    let outcome = body(inputs).await;
                    (task_name, outcome)
                }
                .instrument(span),
            );
            self.names.insert(handle.id(), name);
        }
    }

    /// Hand still-running tasks to a background drain.
    fn abandon_in_flight(&mut self) {
        if self.in_flight.is_empty() {
            return;
        }

        let mut rest = std::mem::take(&mut self.in_flight);
        let mut names = std::mem::take(&mut self.names);
        debug!(
            abandoned = rest.len(),
            "letting in-flight tasks of the failed run finish in the background"
        );

        tokio::spawn(async move {
            while let Some(joined) = rest.join_next_with_id().await {
                match joined {
                    Ok((_, (name, Ok(_)))) => {
                        debug!(task = %name, "discarding result of task from failed run");
                    }
                    Ok((_, (name, Err(err)))) => {
                        warn!(task = %name, error = %err, "task from failed run also failed");
                    }
                    Err(err) => {
                        let name = names.remove(&err.id()).unwrap_or_default();
                        warn!(task = %name, error = %err, "task from failed run did not complete");
                    }
                }
            }
        });
    }
}

fn join_failure(name: &str, err: &JoinError) -> PedigreeError {
    warn!(task = %name, error = %err, "task did not complete");
    PedigreeError::TaskPanicked(name.to_string())
}

/// Run a task graph to completion on the current Tokio runtime.
pub async fn execute<T>(graph: TaskGraph<T>) -> Result<TaskResults<T>>
where
    T: Clone + Send + 'static,
{
    Runtime::new(graph).run().await
}
