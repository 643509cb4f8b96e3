// src/workflow/ancestry.rs

use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::gateway::{remote_status_error, Gateway};
use crate::indexer::{index_ancestry, AncestryIndex};
use crate::person::{lock_arena, PersonsPayload, SharedArena};
use crate::workflow::paths;

/// Fetch `generations` generations of ancestors and index them by
/// ahnentafel number.
///
/// Anything but a 200 is a remote status error.
pub async fn fetch_ancestry(
    gateway: Arc<dyn Gateway>,
    arena: SharedArena,
    person_id: String,
    generations: u8,
) -> Result<AncestryIndex> {
    let path = paths::ancestry(&person_id, generations);
    let response = gateway.get(&path).await?;

    if response.status != 200 {
        return Err(remote_status_error(&response));
    }

    let payload: PersonsPayload = response.parse_data(&path)?.unwrap_or_default();

    let received = payload.persons.len();
    let index = index_ancestry(&mut lock_arena(&arena), payload.persons);

    info!(
        person = %person_id,
        received,
        indexed = index.len(),
        "ancestry indexed"
    );
    Ok(index)
}
