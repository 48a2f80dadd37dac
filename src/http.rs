//! # HTTP Transport
//!
//! [`HttpTransport`] is the production [`Transport`]: a `reqwest` client that speaks
//! `application/vnd.api+json`, resolves relative paths (and server-sent pagination
//! links) against a base URL, and enforces a per-request timeout.

use crate::config::ClientConfig;
use async_trait::async_trait;
use jsonapi_core::{JsonApiError, Method, Request, Response, Transport, JSONAPI_MEDIA_TYPE};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, JsonApiError> {
        let base_url = parse_base(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(JsonApiError::transport)?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, JsonApiError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL as a link would be: `books/1` lands under
    /// the base path, `/v1/books?page=2` at the host root, absolute URLs pass through.
    pub fn resolve(&self, path: &str) -> Result<Url, JsonApiError> {
        self.base_url
            .join(path)
            .map_err(|e| JsonApiError::InvalidUrl(format!("{path}: {e}")))
    }
}

/// A base without a trailing slash would lose its last segment when joined.
fn parse_base(base_url: &str) -> Result<Url, JsonApiError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&normalized).map_err(|e| JsonApiError::InvalidUrl(format!("{base_url}: {e}")))
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: Request) -> Result<Response, JsonApiError> {
        let url = self.resolve(&request.url)?;
        debug!(method = %request.method, %url, "HTTP request");

        let mut builder = self
            .client
            .request(to_reqwest(request.method), url.clone())
            .header(ACCEPT, JSONAPI_MEDIA_TYPE);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, JSONAPI_MEDIA_TYPE)
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%url, error = %e, "HTTP request failed");
            JsonApiError::transport(e)
        })?;

        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }
        let body = response.text().await.map_err(JsonApiError::transport)?;
        debug!(%url, status, bytes = body.len(), "HTTP response");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
