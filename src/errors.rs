// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::dag::TaskName;

#[derive(Error, Debug)]
pub enum PedigreeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Duplicate task in graph: {0}")]
    DuplicateTask(TaskName),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    MissingDependency { task: TaskName, dependency: TaskName },

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote call failed with status {status} {status_text}")]
    RemoteStatus {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Unexpected payload from {path}: {reason}")]
    UnexpectedPayload { path: String, reason: String },

    #[error("Malformed pedigree position: {0}")]
    MalformedPosition(String),

    #[error("Task panicked: {0}")]
    TaskPanicked(TaskName),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PedigreeError {
    /// Status code carried by a remote status error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PedigreeError::RemoteStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PedigreeError>;
