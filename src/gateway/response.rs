// src/gateway/response.rs

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{PedigreeError, Result};

/// A completed remote call: status, headers and parsed JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Canonical reason phrase for `status` (e.g. "Not Found").
    pub status_text: String,
    /// Header map with lower-cased names.
    pub headers: HashMap<String, String>,
    /// Parsed JSON body; `None` for empty (no-content) or non-JSON bodies.
    pub data: Option<Value>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            status,
            status_text,
            headers: HashMap::new(),
            data: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The redirect target, if the response carries one.
    pub fn location(&self) -> Option<&str> {
        self.header("location").filter(|value| !value.is_empty())
    }

    /// Deserialize the body as `D`.
    ///
    /// An absent body yields `Ok(None)`; a body of the wrong shape is an
    /// `UnexpectedPayload` error attributed to `path`.
    pub fn parse_data<D: DeserializeOwned>(&self, path: &str) -> Result<Option<D>> {
        match &self.data {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| PedigreeError::UnexpectedPayload {
                    path: path.to_string(),
                    reason: err.to_string(),
                }),
        }
    }
}
