use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Which descendant lookup the workflow runs next to `ancestry`.
///
/// - `Children`: direct children of the person, as a flat list.
/// - `Descendancy`: one generation of descendancy, split into the person's
///   spouse and children by descendancy number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DescendantMode {
    Children,
    Descendancy,
}

impl Default for DescendantMode {
    fn default() -> Self {
        DescendantMode::Children
    }
}

impl DescendantMode {
    /// Task name (and result key) used for this mode.
    pub fn task_name(self) -> &'static str {
        match self {
            DescendantMode::Children => "children",
            DescendantMode::Descendancy => "descendancy",
        }
    }
}

impl fmt::Display for DescendantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_name())
    }
}

/// Remote API environment the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    Integration,
    Beta,
    Production,
}

impl Default for GatewayEnvironment {
    fn default() -> Self {
        GatewayEnvironment::Integration
    }
}

impl GatewayEnvironment {
    /// Base URL of the API host for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            GatewayEnvironment::Integration => "https://api-integ.familysearch.org",
            GatewayEnvironment::Beta => "https://apibeta.familysearch.org",
            GatewayEnvironment::Production => "https://api.familysearch.org",
        }
    }
}
