//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] entirely in memory. Tests queue the
//! requests they expect, in order, together with the reply each one should get. That
//! makes it possible to exercise collections, typed clients and pagers without a
//! server, and to inject failures (404s, HTML error pages, dropped connections) that
//! are awkward to reproduce against a real API.
//!
//! | Feature | MockTransport | Real HTTP transport |
//! |---------|---------------|---------------------|
//! | **Speed** | Instant (in-memory) | Network bound |
//! | **Determinism** | 100% deterministic | Subject to the server |
//! | **Error Injection** | `return_status`, `return_err` | Hard |
//! | **Use Case** | Unit and integration tests of client logic | Production |
//!
//! ## Example
//!
//! ```rust
//! use jsonapi_core::mock::MockTransport;
//! use jsonapi_core::{Request, Transport};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("/books/1")
//!         .return_document(json!({"data": {"type": "books", "id": "1"}}));
//!
//!     let response = mock.perform(Request::get("/books/1")).await.unwrap();
//!     assert_eq!(response.status, 200);
//!     assert!(response.is_json());
//!
//!     // Every queued expectation was consumed.
//!     mock.verify();
//! }
//! ```
//!
//! A request that does not match the next expectation (method and URL), or arrives when
//! none is queued, panics so the test fails at the offending call.

use crate::error::JsonApiError;
use crate::transport::{Method, Request, Response, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Reply {
    Response(Response),
    Error(JsonApiError),
}

struct Expectation {
    method: Method,
    url: String,
    reply: Reply,
}

/// An in-memory transport with ordered expectations.
///
/// Cloning shares the expectation queue and the request log, so a test can keep one
/// handle while a collection owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a request with `method` to exactly `url`.
    pub fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, url)
    }

    pub fn expect_post(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, url)
    }

    pub fn expect_patch(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Patch, url)
    }

    pub fn expect_delete(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Delete, url)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Panics if some expectations were never consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform(&self, request: Request) -> Result<Response, JsonApiError> {
        self.requests.lock().unwrap().push(request.clone());

        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected request {} {}", request.method, request.url);
        };

        if expectation.method != request.method || expectation.url != request.url {
            panic!(
                "Expected {} {}, got {} {}",
                expectation.method, expectation.url, request.method, request.url
            );
        }

        match expectation.reply {
            Reply::Response(response) => Ok(response),
            Reply::Error(error) => Err(error),
        }
    }
}

/// Builder for the reply of one expected request.
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Replies `200` with `body` as a JSON:API document.
    pub fn return_document(self, body: Value) {
        self.return_json(200, body);
    }

    /// Replies with `status` and `body` as a JSON:API document.
    pub fn return_json(self, status: u16, body: Value) {
        self.push(Reply::Response(Response::json(status, &body)));
    }

    /// Replies with `status` and an empty, untyped body.
    pub fn return_status(self, status: u16) {
        self.push(Reply::Response(Response::new(status)));
    }

    pub fn return_response(self, response: Response) {
        self.push(Reply::Response(response));
    }

    /// Fails the request as the transport would, e.g. on a dropped connection.
    pub fn return_err(self, error: JsonApiError) {
        self.push(Reply::Error(error));
    }

    fn push(self, reply: Reply) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            url: self.url,
            reply,
        });
    }
}
