// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::DescendantMode;

/// Command-line arguments for `pedigree`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pedigree",
    version,
    about = "Assemble a person's ancestry, descendants and portraits from a genealogy API.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pedigree.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Person to assemble the pedigree for.
    ///
    /// If omitted, the person linked to the authenticated user is used.
    #[arg(long, value_name = "ID")]
    pub person: Option<String>,

    /// Descendant lookup to run; overrides `[workflow].descendants`.
    #[arg(long, value_enum, value_name = "MODE")]
    pub descendants: Option<DescendantMode>,

    /// Portrait lookups in flight at once; overrides
    /// `[workflow].portrait_concurrency`.
    #[arg(long, value_name = "N")]
    pub portrait_concurrency: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PEDIGREE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task graph, but make no remote call.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
