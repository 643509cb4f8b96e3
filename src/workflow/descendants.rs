// src/workflow/descendants.rs

use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::gateway::{remote_status_error, Gateway};
use crate::indexer::{partition_descendancy, Descendancy};
use crate::person::{lock_arena, Person, PersonKey, PersonsPayload, SharedArena};
use crate::workflow::paths;

/// Fetch persons from `path`, treating a 2xx without a body (typically
/// 204 No Content) as an empty list.
async fn fetch_persons(gateway: &dyn Gateway, path: &str) -> Result<Vec<Person>> {
    let response = gateway.get(path).await?;

    if !response.is_success() {
        return Err(remote_status_error(&response));
    }

    let payload: PersonsPayload = response.parse_data(path)?.unwrap_or_default();
    Ok(payload.persons)
}

/// Direct children of the person, in the order the API returns them.
pub async fn fetch_children(
    gateway: Arc<dyn Gateway>,
    arena: SharedArena,
    person_id: String,
) -> Result<Vec<PersonKey>> {
    let persons = fetch_persons(gateway.as_ref(), &paths::children(&person_id)).await?;

    let keys = lock_arena(&arena).insert_all(persons);
    info!(person = %person_id, children = keys.len(), "children fetched");
    Ok(keys)
}

/// One generation of descendancy, split into spouse and children.
pub async fn fetch_descendancy(
    gateway: Arc<dyn Gateway>,
    arena: SharedArena,
    person_id: String,
    include_spouse: bool,
) -> Result<Descendancy> {
    let persons = fetch_persons(gateway.as_ref(), &paths::descendancy(&person_id)).await?;

    let descendancy = partition_descendancy(&mut lock_arena(&arena), persons, include_spouse);

    info!(
        person = %person_id,
        spouse = descendancy.spouse.is_some(),
        children = descendancy.children.len(),
        "descendancy fetched"
    );
    Ok(descendancy)
}
