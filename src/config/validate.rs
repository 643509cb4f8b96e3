// src/config/validate.rs

use reqwest::Url;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PedigreeError, Result};

/// Deepest ancestry the remote API serves in one call.
pub const MAX_GENERATIONS: u8 = 8;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PedigreeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.gateway, raw.workflow))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_gateway(cfg)?;
    validate_workflow(cfg)?;
    Ok(())
}

fn validate_gateway(cfg: &RawConfigFile) -> Result<()> {
    if let Some(base_url) = cfg.gateway.base_url.as_deref() {
        let url = Url::parse(base_url).map_err(|err| {
            PedigreeError::ConfigError(format!(
                "[gateway].base_url '{}' is not a valid URL: {}",
                base_url, err
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PedigreeError::ConfigError(format!(
                "[gateway].base_url must be http or https (got '{}')",
                url.scheme()
            )));
        }
    }

    if cfg.gateway.timeout_secs == 0 {
        return Err(PedigreeError::ConfigError(
            "[gateway].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_workflow(cfg: &RawConfigFile) -> Result<()> {
    let generations = cfg.workflow.generations;
    if !(1..=MAX_GENERATIONS).contains(&generations) {
        return Err(PedigreeError::ConfigError(format!(
            "[workflow].generations must be between 1 and {} (got {})",
            MAX_GENERATIONS, generations
        )));
    }

    if cfg.workflow.portrait_concurrency == 0 {
        return Err(PedigreeError::ConfigError(
            "[workflow].portrait_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
