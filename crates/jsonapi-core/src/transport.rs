//! # Transport Seam
//!
//! The core never talks HTTP itself. Everything that crosses the network goes through
//! one capability, [`Transport::perform`], which takes a [`Request`] and hands back a
//! [`Response`] envelope (status, headers, body). Any implementation that returns a
//! well-formed JSON body is treated identically, whether it is a real HTTP client or
//! the in-memory [`MockTransport`](crate::mock::MockTransport).
//!
//! Timeouts and retries belong to the implementation; the core neither sets nor
//! interprets them.

use crate::document::Document;
use crate::error::JsonApiError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Media type of JSON:API documents.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// HTTP methods used by the collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Document>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, document: Document) -> Self {
        self.body = Some(document);
        self
    }
}

/// The envelope a transport returns: status code, headers and raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Header names are stored lower-cased.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// A response carrying `value` as a JSON:API body.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status)
            .header("content-type", JSONAPI_MEDIA_TYPE)
            .with_body(value.to_string())
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    /// True for `application/json`, `application/vnd.api+json` and similar.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|essence| {
                let essence = essence.trim().to_ascii_lowercase();
                essence == "application/json" || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as a document.
    pub fn document(&self) -> Result<Document, JsonApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// The one capability the core needs from the outside world.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: Request) -> Result<Response, JsonApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform(&self, request: Request) -> Result<Response, JsonApiError> {
        (**self).perform(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_detection_accepts_vendor_and_plain_json() {
        assert!(Response::new(200)
            .header("Content-Type", "application/vnd.api+json")
            .is_json());
        assert!(Response::new(200)
            .header("content-type", "application/json; charset=utf-8")
            .is_json());
        assert!(!Response::new(200).header("content-type", "text/html").is_json());
        assert!(!Response::new(200).is_json());
    }

    #[test]
    fn body_parses_into_a_document() {
        let response = Response::json(200, &json!({"data": {"type": "books", "id": "1"}}));
        let document = response.document().unwrap();
        assert!(document.data.is_some());
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        let response = Response::new(200)
            .header("content-type", JSONAPI_MEDIA_TYPE)
            .with_body("{not json");
        assert!(matches!(response.document(), Err(JsonApiError::Json(_))));
    }
}
