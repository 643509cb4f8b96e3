// src/dag/task.rs

//! Task declarations and the validated [`TaskGraph`].

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::dag::graph::DagGraph;
use crate::dag::TaskName;
use crate::errors::Result;

/// Resolved results of a task's declared dependencies, keyed by task name.
///
/// A task only ever sees the dependencies it declared, never the rest of
/// the graph's results.
pub type TaskInputs<T> = HashMap<TaskName, T>;

/// Boxed future produced by a task body.
pub type TaskFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Type-erased task body: consumes its inputs once and yields a future.
pub type TaskFn<T> = Box<dyn FnOnce(TaskInputs<T>) -> TaskFuture<T> + Send + 'static>;

/// A validated DAG of named tasks together with their bodies.
///
/// Built through [`TaskGraphBuilder`]; construction fails on duplicate names,
/// unknown dependencies and cycles, so a `TaskGraph` never fails for
/// structural reasons at execution time.
pub struct TaskGraph<T> {
    graph: DagGraph,
    bodies: HashMap<TaskName, TaskFn<T>>,
}

impl<T> fmt::Debug for TaskGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}

impl<T> TaskGraph<T> {
    pub fn builder() -> TaskGraphBuilder<T> {
        TaskGraphBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Task names in topological order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.graph.tasks()
    }

    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.graph.dependencies_of(name)
    }

    pub fn topological_order(&self) -> &[TaskName] {
        self.graph.topological_order()
    }

    /// Split into the adjacency structure and the task bodies.
    pub fn into_parts(self) -> (DagGraph, HashMap<TaskName, TaskFn<T>>) {
        (self.graph, self.bodies)
    }
}

struct Declaration<T> {
    name: TaskName,
    deps: Vec<TaskName>,
    body: TaskFn<T>,
}

/// Collects task declarations; validation happens in [`build`](Self::build).
pub struct TaskGraphBuilder<T> {
    tasks: Vec<Declaration<T>>,
}

impl<T> Default for TaskGraphBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskGraphBuilder<T> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Declare a task named `name` that consumes the results of `deps`.
    ///
    /// A task with no dependencies is eligible as soon as the run starts.
    pub fn task<F, Fut>(mut self, name: impl Into<TaskName>, deps: &[&str], run: F) -> Self
    where
        T: 'static,
        F: FnOnce(TaskInputs<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let body: TaskFn<T> = Box::new(move |inputs| -> TaskFuture<T> { Box::pin(run(inputs)) });
        self.tasks.push(Declaration {
            name: name.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            body,
        });
        self
    }

    /// Validate the declarations and produce a [`TaskGraph`].
    pub fn build(self) -> Result<TaskGraph<T>> {
        let graph = DagGraph::from_declarations(
            self.tasks
                .iter()
                .map(|decl| (decl.name.as_str(), decl.deps.as_slice())),
        )?;

        let bodies = self
            .tasks
            .into_iter()
            .map(|decl| (decl.name, decl.body))
            .collect();

        Ok(TaskGraph { graph, bodies })
    }
}
