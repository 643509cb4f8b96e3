// src/workflow/portraits.rs

//! Best-effort portrait enrichment.
//!
//! One job per person goes through a [`WorkQueue`]; each worker looks up the
//! portrait and, when the response carries a `Location`, attaches it to the
//! person in the shared arena. Nothing in here can fail the workflow.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::{QueueDrained, WorkQueue};
use crate::errors::Result;
use crate::gateway::{remote_status_error, Gateway};
use crate::person::{lock_arena, PersonKey, SharedArena};
use crate::workflow::paths;

/// "Fetch the portrait for this person."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortraitJob {
    pub key: PersonKey,
    pub person_id: String,
}

/// Portrait location for a person, if any.
///
/// A response with a `Location` header is a hit regardless of status; an
/// error status without one is reported as a remote status error; anything
/// else is a plain miss.
pub async fn lookup_portrait(gateway: &dyn Gateway, person_id: &str) -> Result<Option<String>> {
    let response = gateway.get(&paths::portrait(person_id)).await?;

    if let Some(location) = response.location() {
        return Ok(Some(location.to_string()));
    }
    if response.status >= 400 {
        return Err(remote_status_error(&response));
    }
    Ok(None)
}

/// Build one job per distinct person among `keys`, in first-seen order.
pub fn portrait_jobs(arena: &SharedArena, keys: impl IntoIterator<Item = PersonKey>) -> Vec<PortraitJob> {
    let arena = lock_arena(arena);
    let mut seen = HashSet::new();

    keys.into_iter()
        .filter(|key| seen.insert(*key))
        .filter_map(|key| {
            arena.get(key).map(|person| PortraitJob {
                key,
                person_id: person.id.clone(),
            })
        })
        .collect()
}

/// Run portrait lookups for `jobs` with at most `concurrency` in flight.
pub async fn enrich_portraits(
    gateway: Arc<dyn Gateway>,
    arena: SharedArena,
    jobs: Vec<PortraitJob>,
    concurrency: usize,
    log_failures: bool,
) -> QueueDrained {
    let queue = WorkQueue::new();
    queue.enqueue_all(jobs);

    info!(jobs = queue.pending(), concurrency, "fetching portraits");

    let drained = queue
        .run(concurrency, move |job: PortraitJob| {
            let gateway = Arc::clone(&gateway);
            let arena = Arc::clone(&arena);
            async move {
                match lookup_portrait(gateway.as_ref(), &job.person_id).await {
                    Ok(Some(url)) => {
                        debug!(person = %job.person_id, %url, "portrait attached");
                        lock_arena(&arena).attach_portrait(job.key, url);
                    }
                    Ok(None) => {
                        debug!(person = %job.person_id, "no portrait");
                    }
                    Err(err) if log_failures => {
                        warn!(person = %job.person_id, error = %err, "portrait lookup failed");
                    }
                    Err(err) => {
                        debug!(person = %job.person_id, error = %err, "portrait lookup failed");
                    }
                }
            }
        })
        .await;

    info!(attempted = drained.attempted, "portraits done");
    drained
}
