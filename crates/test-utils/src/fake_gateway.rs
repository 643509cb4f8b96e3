use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pedigree::errors::PedigreeError;
use pedigree::gateway::{Gateway, GatewayFuture, Response};
use tokio::sync::Notify;

#[derive(Debug, Clone)]
enum Route {
    Respond(Response),
    Fail(String),
}

/// A scripted gateway that:
/// - answers each path with a fixed response or transport failure
///   (unknown paths get a `404`)
/// - records every path it was asked for, in call order
/// - can hold a path until the test opens its gate
/// - tracks the highest number of concurrent calls seen
#[derive(Debug, Default)]
pub struct FakeGateway {
    routes: Mutex<HashMap<String, Route>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Answer `path` with `response`.
    pub fn respond(&self, path: impl Into<String>, response: Response) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path.into(), Route::Respond(response));
        self
    }

    /// Fail `path` with a transport error.
    pub fn fail(&self, path: impl Into<String>, message: impl Into<String>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(path.into(), Route::Fail(message.into()));
        self
    }

    /// Hold calls to `path` until the returned gate is notified.
    pub fn gate(&self, path: impl Into<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.into(), Arc::clone(&gate));
        gate
    }

    /// Sleep this long inside every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Paths requested so far, in the order calls started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths whose calls have returned, in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    /// Number of calls made to paths starting with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|path| path.starts_with(prefix))
            .count()
    }

    /// Highest number of calls that were in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(&self, path: String) -> pedigree::errors::Result<Response> {
        self.calls.lock().unwrap().push(path.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(&path).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let route = self.routes.lock().unwrap().get(&path).cloned();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(path.clone());

        match route {
            Some(Route::Respond(response)) => Ok(response),
            Some(Route::Fail(message)) => Err(PedigreeError::Transport(message)),
            None => Ok(Response::new(404)),
        }
    }
}

impl Gateway for FakeGateway {
    fn get(&self, path: &str) -> GatewayFuture<'_> {
        let path = path.to_string();
        Box::pin(self.answer(path))
    }
}
