//! Arguments and result of the fetch primitive.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Error;

/// First argument of a fetch: either a bare URL or a request record that
/// exposes a `url` field.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Resource {
    Url(String),
    Request(Request),
}

impl From<&str> for Resource {
    fn from(url: &str) -> Self {
        Resource::Url(url.to_string())
    }
}

impl From<String> for Resource {
    fn from(url: String) -> Self {
        Resource::Url(url)
    }
}

/// Request record form of a [`Resource`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: BTreeMap::new(),
        }
    }
}

/// Optional second fetch argument. Fields present here override the
/// corresponding fields of a [`Request`].
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct RequestInit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl RequestInit {
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// Argument tuple of the fetch primitive.
pub type FetchArgs = (Resource, Option<RequestInit>);

/// A successful (2xx) upstream response with its body read to a string.
///
/// Serializes as status and url only. The logger serializes every result to
/// describe it, and the body can be large.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub url: String,
    #[serde(skip_serializing)]
    pub body: String,
}

impl FetchResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, Error> {
        serde_json::from_str(&self.body).map_err(|e| {
            tracing::error!(
                "Failed to parse resource: {} | body: {}",
                e,
                truncate_body(&self.body)
            );
            Error::Decode(e.to_string())
        })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
