// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::{DescendantMode, GatewayEnvironment};
use crate::workflow::WorkflowOptions;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [gateway]
/// environment = "integration"
/// access_token_env = "FS_ACCESS_TOKEN"
///
/// [workflow]
/// generations = 2
/// descendants = "descendancy"
/// portrait_concurrency = 4
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub workflow: WorkflowSection,
}

/// A validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`].
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub gateway: GatewaySection,
    pub workflow: WorkflowSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(gateway: GatewaySection, workflow: WorkflowSection) -> Self {
        Self { gateway, workflow }
    }
}

/// `[gateway]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySection {
    #[serde(default)]
    pub environment: GatewayEnvironment,

    /// Explicit API host; overrides `environment` when set.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token. Takes precedence over `access_token_env`.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_access_token_env() -> String {
    "FS_ACCESS_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            environment: GatewayEnvironment::default(),
            base_url: None,
            access_token: None,
            access_token_env: default_access_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewaySection {
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    /// `access_token`, else the value of `$access_token_env` if set and
    /// non-empty.
    pub fn resolved_access_token(&self) -> Option<String> {
        self.access_token.clone().or_else(|| {
            std::env::var(&self.access_token_env)
                .ok()
                .filter(|token| !token.trim().is_empty())
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[workflow]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSection {
    /// Ancestry generations to request (1..=8).
    #[serde(default = "default_generations")]
    pub generations: u8,

    /// `"children"` (default) or `"descendancy"`.
    #[serde(default)]
    pub descendants: DescendantMode,

    /// Descendancy variant only: keep the root's spouse record.
    #[serde(default = "default_true")]
    pub include_spouse: bool,

    /// Portrait lookups in flight at once (>= 1).
    #[serde(default = "default_portrait_concurrency")]
    pub portrait_concurrency: usize,

    /// Log portrait failures at warn level instead of debug.
    #[serde(default)]
    pub log_portrait_failures: bool,
}

fn default_generations() -> u8 {
    2
}

fn default_true() -> bool {
    true
}

fn default_portrait_concurrency() -> usize {
    1
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            generations: default_generations(),
            descendants: DescendantMode::default(),
            include_spouse: default_true(),
            portrait_concurrency: default_portrait_concurrency(),
            log_portrait_failures: false,
        }
    }
}

impl WorkflowSection {
    pub fn to_options(&self) -> WorkflowOptions {
        WorkflowOptions {
            generations: self.generations,
            descendants: self.descendants,
            include_spouse: self.include_spouse,
            portrait_concurrency: self.portrait_concurrency,
            log_portrait_failures: self.log_portrait_failures,
        }
    }
}
