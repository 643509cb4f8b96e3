// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::TaskName;
use crate::errors::{PedigreeError, Result};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Direct dependencies: tasks whose results this one consumes.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that consume this one's result.
    dependents: Vec<TaskName>,
}

/// In-memory DAG keyed by task name.
///
/// Only constructed through [`DagGraph::from_declarations`], which rejects
/// duplicate names, unknown or self dependencies and cycles. Everything that
/// holds a `DagGraph` can therefore assume a well-formed DAG.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: HashMap<TaskName, DagNode>,
    /// Topological order (dependencies before dependents).
    order: Vec<TaskName>,
}

impl DagGraph {
    /// Build and validate a DAG from `(name, deps)` declarations.
    pub fn from_declarations<'a, I>(decls: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [TaskName])>,
    {
        let decls: Vec<(&str, &[TaskName])> = decls.into_iter().collect();

        let mut seen: HashSet<&str> = HashSet::new();
        for &(name, _) in decls.iter() {
            if !seen.insert(name) {
                return Err(PedigreeError::DuplicateTask(name.to_string()));
            }
        }

        for &(name, deps) in decls.iter() {
            for dep in deps.iter() {
                if !seen.contains(dep.as_str()) {
                    return Err(PedigreeError::MissingDependency {
                        task: name.to_string(),
                        dependency: dep.clone(),
                    });
                }
                if dep == name {
                    return Err(PedigreeError::DagCycle(format!(
                        "task '{}' cannot depend on itself",
                        name
                    )));
                }
            }
        }

        let order = topological_order(&decls)?;

        let mut nodes: HashMap<TaskName, DagNode> = HashMap::new();
        for &(name, deps) in decls.iter() {
            nodes.insert(
                name.to_string(),
                DagNode {
                    deps: deps.to_vec(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: populate dependents based on deps, in declaration
        // order so that iteration stays stable.
        for &(name, deps) in decls.iter() {
            for dep in deps.iter() {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(name.to_string());
                }
            }
        }

        Ok(Self { nodes, order })
    }

    /// Number of tasks in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All task names in topological order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Tasks in topological order (dependencies first).
    pub fn topological_order(&self) -> &[TaskName] {
        &self.order
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}

fn topological_order(decls: &[(&str, &[TaskName])]) -> Result<Vec<TaskName>> {
    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for &(name, _) in decls.iter() {
        graph.add_node(name);
    }

    for &(name, deps) in decls.iter() {
        for dep in deps.iter() {
            graph.add_edge(dep.as_str(), name, ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => Err(PedigreeError::DagCycle(format!(
            "cycle detected in task graph involving task '{}'",
            cycle.node_id()
        ))),
    }
}
