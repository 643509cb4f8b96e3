// src/gateway/mod.rs

//! Remote Call Gateway.
//!
//! The workflow talks to the remote genealogy API only through the
//! [`Gateway`] trait, so tests can swap in a scripted fake while production
//! uses [`HttpGateway`].
//!
//! - [`response`] holds the transport-neutral [`Response`] type.
//! - [`http`] provides the `reqwest`-backed implementation.

pub mod http;
pub mod response;

use std::future::Future;
use std::pin::Pin;

use crate::errors::{PedigreeError, Result};

pub use http::HttpGateway;
pub use response::Response;

/// Future returned by [`Gateway::get`].
pub type GatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;

/// Trait abstracting how remote GET requests are issued.
///
/// The implementation is expected to be already authenticated and scoped to
/// one request. Every HTTP status, success or not, is an `Ok(Response)`;
/// `Err` is reserved for transport failures (connection refused, timeout,
/// unreadable body).
pub trait Gateway: Send + Sync {
    fn get(&self, path: &str) -> GatewayFuture<'_>;
}

/// Convert a non-success [`Response`] into a remote status error carrying
/// the status, reason text and body.
pub fn remote_status_error(response: &Response) -> PedigreeError {
    PedigreeError::RemoteStatus {
        status: response.status,
        status_text: response.status_text.clone(),
        body: response
            .data
            .as_ref()
            .map(|data| data.to_string())
            .unwrap_or_default(),
    }
}
