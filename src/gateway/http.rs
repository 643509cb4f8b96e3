// src/gateway/http.rs

//! `reqwest`-backed [`Gateway`].

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;

use crate::config::model::GatewaySection;
use crate::errors::{PedigreeError, Result};
use crate::gateway::{Gateway, GatewayFuture, Response};

/// Media type the genealogy API serves its JSON under.
const FS_JSON: &str = "application/x-fs-v1+json";

/// Production gateway issuing authenticated GET requests.
///
/// Redirects are never followed: portrait lookups answer with a redirect
/// whose `Location` header *is* the result.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|err| PedigreeError::Transport(format!("building HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Build a gateway from the `[gateway]` config section.
    pub fn from_config(cfg: &GatewaySection) -> Result<Self> {
        Self::new(
            cfg.resolved_base_url(),
            cfg.resolved_access_token(),
            cfg.timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%path, "GET");

        let mut request = self.client.get(&url).header(ACCEPT, FS_JSON);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|err| PedigreeError::Transport(format!("GET {path}: {err}")))?;

        let mut response = Response::new(resp.status().as_u16());
        for (name, value) in resp.headers() {
            if let Ok(value) = value.to_str() {
                response = response.with_header(name.as_str(), value);
            }
        }

        let body = resp
            .bytes()
            .await
            .map_err(|err| PedigreeError::Transport(format!("reading body of GET {path}: {err}")))?;

        if !body.is_empty() {
            response.data = serde_json::from_slice(&body).ok();
        }

        debug!(%path, status = response.status, has_body = response.data.is_some(), "response");
        Ok(response)
    }
}

impl Gateway for HttpGateway {
    fn get(&self, path: &str) -> GatewayFuture<'_> {
        let path = path.to_string();
        Box::pin(async move { self.fetch(&path).await })
    }
}
