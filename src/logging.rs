// src/logging.rs

//! Diagnostics for `pedigree` runs.
//!
//! stdout is reserved for the assembled pedigree JSON, so every event goes
//! to stderr. The level comes from `--log-level`, else `PEDIGREE_LOG`, else
//! `info`. At `info` a run logs one line per task start and per fetched
//! section; `debug` adds individual requests, portrait misses and skipped
//! position numbers.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "PEDIGREE_LOG";

/// Install the stderr subscriber for this process.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))?;

    Ok(())
}

/// Effective level given the CLI flag and the raw `PEDIGREE_LOG` value.
///
/// An unrecognised `PEDIGREE_LOG` value falls back to `info`.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_value.and_then(|raw| raw.trim().parse().ok()))
        .unwrap_or(Level::INFO)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
