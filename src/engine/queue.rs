// src/engine/queue.rs

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinSet;
use tracing::{debug, warn};

type Pending<J> = Arc<Mutex<VecDeque<J>>>;

fn lock<J>(pending: &Pending<J>) -> MutexGuard<'_, VecDeque<J>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Summary handed back when a [`WorkQueue::run`] drains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueDrained {
    /// Jobs handed to a worker during this run.
    pub attempted: usize,
    /// Jobs whose worker panicked (counted, never propagated).
    pub panicked: usize,
}

/// Queue of homogeneous jobs executed with bounded concurrency.
///
/// Semantics:
/// - Jobs are started in insertion order, but with a limit above 1 they may
///   finish in any order.
/// - Workers own their error handling: a worker returns `()`, so one job's
///   failure cannot abort the others. A panicking worker is logged and
///   counted in [`QueueDrained::panicked`].
/// - [`run`](Self::run) resolves exactly once per call, after every job that
///   was pending at the start, or enqueued while it was running, has been
///   attempted and no worker is still in flight.
#[derive(Debug)]
pub struct WorkQueue<J> {
    pending: Pending<J>,
}

/// Cloneable handle for adding jobs to a [`WorkQueue`], including while it
/// is running.
#[derive(Debug)]
pub struct QueueHandle<J> {
    pending: Pending<J>,
}

impl<J> Clone for QueueHandle<J> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<J> QueueHandle<J> {
    pub fn enqueue(&self, job: J) {
        lock(&self.pending).push_back(job);
    }
}

impl<J> Default for WorkQueue<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> WorkQueue<J> {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn enqueue(&self, job: J) {
        lock(&self.pending).push_back(job);
    }

    /// Enqueue zero or more jobs, preserving their order.
    pub fn enqueue_all(&self, jobs: impl IntoIterator<Item = J>) {
        lock(&self.pending).extend(jobs);
    }

    /// Number of jobs waiting to be started.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    pub fn handle(&self) -> QueueHandle<J> {
        QueueHandle {
            pending: Arc::clone(&self.pending),
        }
    }

    fn pop(&self) -> Option<J> {
        lock(&self.pending).pop_front()
    }

    /// Execute all pending jobs with at most `concurrency_limit` workers in
    /// flight, returning once the queue has drained.
    ///
    /// `concurrency_limit` is clamped to at least 1.
    pub async fn run<F, Fut>(&self, concurrency_limit: usize, mut worker: F) -> QueueDrained
    where
        F: FnMut(J) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let limit = concurrency_limit.max(1);
        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut drained = QueueDrained::default();

        debug!(limit, pending = self.pending(), "work queue run started");

        loop {
            while in_flight.len() < limit {
                let Some(job) = self.pop() else {
                    break;
                };
                drained.attempted += 1;
                in_flight.spawn(worker(job));
            }

            match in_flight.join_next().await {
                Some(Ok(())) => {}
                Some(Err(err)) => {
                    drained.panicked += 1;
                    warn!(error = %err, "work queue job did not complete; continuing");
                }
                // Nothing in flight: done unless a job arrived in between.
                None if self.is_empty() => break,
                None => {}
            }
        }

        debug!(
            attempted = drained.attempted,
            panicked = drained.panicked,
            "work queue drained"
        );
        drained
    }
}
