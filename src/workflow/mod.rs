// src/workflow/mod.rs

//! Pedigree Aggregation Workflow.
//!
//! For one person identifier this builds a three-task graph:
//!
//! ```text
//! ancestry ──┐
//!            ├──> portraits
//! children ──┘    (or `descendancy`)
//! ```
//!
//! `ancestry` and the descendant task run concurrently; `portraits` starts
//! only after both succeed and drives a [`WorkQueue`](crate::engine::WorkQueue)
//! over everyone they discovered. All three share one [`PersonArena`], so
//! portraits attached by the queue show up in the final [`Pedigree`].

pub mod ancestry;
pub mod current_user;
pub mod descendants;
pub mod paths;
pub mod pedigree;
pub mod portraits;

use std::sync::Arc;

use anyhow::anyhow;
use tracing::info;

use crate::dag::{TaskGraph, TaskInputs};
use crate::engine::{execute, QueueDrained};
use crate::errors::{PedigreeError, Result};
use crate::gateway::Gateway;
use crate::indexer::{AncestryIndex, Descendancy};
use crate::person::{lock_arena, PersonArena, PersonKey, SharedArena};
use crate::types::DescendantMode;

pub use current_user::resolve_current_person;
pub use pedigree::{Descendants, Pedigree};
pub use portraits::{lookup_portrait, PortraitJob};

pub const ANCESTRY: &str = "ancestry";
pub const PORTRAITS: &str = "portraits";

/// Knobs of the workflow. See `[workflow]` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Generations of ancestry to request.
    pub generations: u8,
    pub descendants: DescendantMode,
    /// Descendancy variant only: keep the root's spouse.
    pub include_spouse: bool,
    /// Portrait lookups in flight at once.
    pub portrait_concurrency: usize,
    /// Log portrait failures at warn instead of debug.
    pub log_portrait_failures: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            generations: 2,
            descendants: DescendantMode::Children,
            include_spouse: true,
            portrait_concurrency: 1,
            log_portrait_failures: false,
        }
    }
}

/// Value produced by each task of the workflow graph.
#[derive(Debug, Clone)]
pub enum Section {
    Ancestry(AncestryIndex),
    Children(Vec<PersonKey>),
    Descendancy(Descendancy),
    Portraits(QueueDrained),
}

impl Section {
    /// People referenced by this section.
    fn people(&self) -> Vec<PersonKey> {
        match self {
            Section::Ancestry(index) => index.values().copied().collect(),
            Section::Children(children) => children.clone(),
            Section::Descendancy(d) => d.people().collect(),
            Section::Portraits(_) => Vec::new(),
        }
    }
}

/// Assembles a [`Pedigree`] through a caller-supplied gateway.
#[derive(Clone)]
pub struct PedigreeWorkflow {
    gateway: Arc<dyn Gateway>,
    options: WorkflowOptions,
}

impl std::fmt::Debug for PedigreeWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PedigreeWorkflow")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PedigreeWorkflow {
    pub fn new(gateway: Arc<dyn Gateway>, options: WorkflowOptions) -> Self {
        Self { gateway, options }
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    /// Build the task graph for `person_id`, with every task writing into
    /// `arena`.
    pub fn build_graph(&self, person_id: &str, arena: SharedArena) -> Result<TaskGraph<Section>> {
        let options = self.options;
        let descendant_task = options.descendants.task_name();

        let ancestry_task = {
            let gateway = Arc::clone(&self.gateway);
            let arena = Arc::clone(&arena);
            let person_id = person_id.to_string();
            move |_: TaskInputs<Section>| async move {
                ancestry::fetch_ancestry(gateway, arena, person_id, options.generations)
                    .await
                    .map(Section::Ancestry)
            }
        };

        let builder = TaskGraph::builder().task(ANCESTRY, &[], ancestry_task);

        let builder = {
            let gateway = Arc::clone(&self.gateway);
            let arena = Arc::clone(&arena);
            let person_id = person_id.to_string();
            match options.descendants {
                DescendantMode::Children => {
                    builder.task(descendant_task, &[], move |_: TaskInputs<Section>| async move {
                        descendants::fetch_children(gateway, arena, person_id)
                            .await
                            .map(Section::Children)
                    })
                }
                DescendantMode::Descendancy => {
                    builder.task(descendant_task, &[], move |_: TaskInputs<Section>| async move {
                        descendants::fetch_descendancy(
                            gateway,
                            arena,
                            person_id,
                            options.include_spouse,
                        )
                        .await
                        .map(Section::Descendancy)
                    })
                }
            }
        };

        let portraits_task = {
            let gateway = Arc::clone(&self.gateway);
            move |inputs: TaskInputs<Section>| async move {
                let keys = [ANCESTRY, descendant_task]
                    .into_iter()
                    .filter_map(|name| inputs.get(name))
                    .flat_map(Section::people);
                let jobs = portraits::portrait_jobs(&arena, keys);
                let drained = portraits::enrich_portraits(
                    gateway,
                    arena,
                    jobs,
                    options.portrait_concurrency,
                    options.log_portrait_failures,
                )
                .await;
                Ok::<_, PedigreeError>(Section::Portraits(drained))
            }
        };

        builder
            .task(PORTRAITS, &[ANCESTRY, descendant_task], portraits_task)
            .build()
    }

    /// Run the whole workflow for `person_id`.
    ///
    /// Fails with the first ancestry/descendant error; portrait problems
    /// never fail the run.
    pub async fn run(&self, person_id: &str) -> Result<Pedigree> {
        info!(person = %person_id, descendants = %self.options.descendants, "assembling pedigree");

        let arena = PersonArena::shared();
        let graph = self.build_graph(person_id, Arc::clone(&arena))?;
        let mut results = execute(graph).await?;

        let ancestry = match results.remove(ANCESTRY) {
            Some(Section::Ancestry(index)) => index,
            _ => return Err(missing_section(ANCESTRY)),
        };

        let descendant_task = self.options.descendants.task_name();
        let descendants = match results.remove(descendant_task) {
            Some(Section::Children(children)) => Descendants::Children(children),
            Some(Section::Descendancy(d)) => Descendants::Descendancy(d),
            _ => return Err(missing_section(descendant_task)),
        };

        let persons = std::mem::take(&mut *lock_arena(&arena));

        Ok(Pedigree {
            root: person_id.to_string(),
            persons,
            ancestry,
            descendants,
        })
    }
}

fn missing_section(task: &str) -> PedigreeError {
    PedigreeError::Other(anyhow!("task '{task}' produced no result of the expected kind"))
}
