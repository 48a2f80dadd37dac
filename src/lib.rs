//! # JSON:API Client
//!
//! > **A typed client for JSON:API servers, built on `jsonapi-core`.**
//!
//! The core crate converts between plain objects and JSON:API documents and walks paged
//! listings. This crate puts that engine behind a small, resource-oriented surface:
//! one [`Collection`] per resource kind, with `one`, `many`, `all`, `create`, `update`
//! and `delete`.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why a transport seam?
//!
//! Collections never talk HTTP directly. They send a [`Request`] through a [`Transport`]
//! and get a [`Response`] envelope back. This provides:
//! - **Testability**: [`MockTransport`](jsonapi_core::mock::MockTransport) replays
//!   canned responses with no server.
//! - **Replaceability**: [`HttpTransport`] (feature `http`, on by default) is only one
//!   implementation.
//!
//! ### Building is not fetching
//!
//! A [`Query`] is plain data. Chaining `filter`, `include` or `sort` never performs I/O;
//! an explicit `execute_*` call or pulling a [`Pager`] does.
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use jsonapi_client::{Client, ClientConfig, Query, ResourceSchema};
//! use jsonapi_core::mock::MockTransport;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("books?include=author").return_document(json!({
//!         "data": [{"type": "books", "id": "1", "attributes": {"title": "Dune"},
//!                   "relationships": {"author": {"data": {"type": "authors", "id": "9"}}}}],
//!         "included": [{"type": "authors", "id": "9", "attributes": {"name": "Frank Herbert"}}]
//!     }));
//!
//!     let client = Client::new(mock.clone(), ClientConfig::default());
//!     let books = client.collection(ResourceSchema::new("books").relationship("author", "authors"));
//!
//!     let page = books.query().include("author").execute_many().await.unwrap();
//!     let book = &page.into_records()[0];
//!     assert_eq!(
//!         book.to_value(),
//!         json!({"id": "1", "title": "Dune", "author": {"id": "9", "name": "Frank Herbert"}})
//!     );
//!     mock.verify();
//! }
//! ```
//!
//! ## 🗺️ Module Tour
//!
//! - [`collection`]: [`Collection`] and its URL templates ([`CollectionUrls`]).
//! - [`query`]: the [`Query`] builder and [`QueryBuilder`] for explicit execution.
//! - [`clients`]: the [`TypedCollection`] trait for resource-specific clients.
//! - [`config`]: [`ClientConfig`], from code, `serde` or the environment.
//! - [`http`]: the `reqwest`-backed [`HttpTransport`].
//!
//! ## 👩‍💻 Errors
//!
//! Every operation returns [`JsonApiError`]. A `404` is `NotFound`, a non-JSON body is
//! `ContentType`, a server `errors` document is `Document` carrying the first error's
//! detail, and transport failures pass through as `Transport`.

pub mod client;
pub mod clients;
pub mod collection;
pub mod config;
#[cfg(feature = "http")]
pub mod http;
pub mod query;

pub use client::Client;
pub use clients::TypedCollection;
pub use collection::{Collection, CollectionUrls};
pub use config::{ClientConfig, ConfigError};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use query::{Direction, Query, QueryBuilder};

pub use jsonapi_core::{
    IncludePolicy, JsonApiError, Pager, Record, Request, ResourceId, ResourceSchema, Response,
    Transport, Unserialized,
};
