// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod gateway;
pub mod indexer;
pub mod logging;
pub mod person;
pub mod types;
pub mod workflow;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::gateway::HttpGateway;
use crate::person::PersonArena;
use crate::workflow::{resolve_current_person, PedigreeWorkflow, WorkflowOptions};

/// Placeholder shown by `--dry-run` when no `--person` was given.
const CURRENT_USER_PLACEHOLDER: &str = "<current user>";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the HTTP gateway
/// - current-user resolution (when `--person` is absent)
/// - the pedigree workflow and JSON output
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref()).context("loading configuration")?;
    let options = workflow_options(&cfg, &args)?;

    let gateway = Arc::new(HttpGateway::from_config(&cfg.gateway)?);
    let workflow = PedigreeWorkflow::new(gateway.clone(), options);

    if args.dry_run {
        let person = args.person.as_deref().unwrap_or(CURRENT_USER_PLACEHOLDER);
        print_dry_run(&cfg, &workflow, person)?;
        return Ok(());
    }

    let person_id = match args.person {
        Some(id) => id,
        None => {
            let id = resolve_current_person(gateway.as_ref())
                .await
                .context("resolving the current user's person")?;
            info!(person = %id, "using current user's person");
            id
        }
    };

    let pedigree = workflow.run(&person_id).await?;
    let view = pedigree.to_view();

    let rendered = if args.compact {
        serde_json::to_string(&view)?
    } else {
        serde_json::to_string_pretty(&view)?
    };
    println!("{rendered}");

    Ok(())
}

/// Config `[workflow]` with CLI overrides applied.
fn workflow_options(cfg: &ConfigFile, args: &CliArgs) -> Result<WorkflowOptions> {
    let mut options = cfg.workflow.to_options();

    if let Some(mode) = args.descendants {
        options.descendants = mode;
    }
    if let Some(limit) = args.portrait_concurrency {
        anyhow::ensure!(limit >= 1, "--portrait-concurrency must be >= 1 (got 0)");
        options.portrait_concurrency = limit;
    }

    Ok(options)
}

/// Print the resolved config and the task graph without running anything.
fn print_dry_run(cfg: &ConfigFile, workflow: &PedigreeWorkflow, person: &str) -> Result<()> {
    let options = workflow.options();

    println!("pedigree dry-run");
    println!("  gateway.base_url = {}", cfg.gateway.resolved_base_url());
    println!("  gateway.timeout_secs = {}", cfg.gateway.timeout_secs);
    println!(
        "  gateway.access_token = {}",
        if cfg.gateway.resolved_access_token().is_some() {
            "set"
        } else {
            "unset"
        }
    );
    println!("  workflow.generations = {}", options.generations);
    println!("  workflow.descendants = {}", options.descendants);
    println!("  workflow.include_spouse = {}", options.include_spouse);
    println!(
        "  workflow.portrait_concurrency = {}",
        options.portrait_concurrency
    );
    println!();

    let graph = workflow.build_graph(person, PersonArena::shared())?;
    println!("tasks for person {person} ({}):", graph.len());
    for name in graph.topological_order() {
        println!("  - {name}");
        let deps = graph.dependencies_of(name);
        if !deps.is_empty() {
            println!("      after: {:?}", deps);
        }
    }

    debug!("dry-run complete (no remote calls)");
    Ok(())
}
