// src/workflow/current_user.rs

//! Resolve the person identifier of the signed-in user.

use serde::Deserialize;
use tracing::debug;

use crate::errors::{PedigreeError, Result};
use crate::gateway::{remote_status_error, Gateway};
use crate::workflow::paths;

#[derive(Debug, Default, Deserialize)]
struct UsersPayload {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    #[serde(default)]
    person_id: Option<String>,
}

/// Person identifier of the user the gateway is authenticated as.
pub async fn resolve_current_person(gateway: &dyn Gateway) -> Result<String> {
    let response = gateway.get(paths::CURRENT_USER).await?;

    if response.status != 200 {
        return Err(remote_status_error(&response));
    }

    let payload: UsersPayload = response
        .parse_data(paths::CURRENT_USER)?
        .unwrap_or_default();

    let person_id = payload
        .users
        .into_iter()
        .next()
        .and_then(|user| user.person_id)
        .ok_or_else(|| PedigreeError::UnexpectedPayload {
            path: paths::CURRENT_USER.to_string(),
            reason: "no personId on current user".to_string(),
        })?;

    debug!(person = %person_id, "resolved current user");
    Ok(person_id)
}
