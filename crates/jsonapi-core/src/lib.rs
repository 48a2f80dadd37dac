//! # JSON:API Core
//!
//! This crate is the engine of a client for APIs that speak the
//! [JSON:API](https://jsonapi.org) hypermedia format. It converts between the wire
//! format (resources with a `type`, an `id`, `attributes` and typed `relationships`,
//! plus a side-loaded `included` list) and plain objects, and it walks listings that
//! span several pages by following their `next` links.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Model** ([`Document`], [`ResourceSchema`], [`Record`]) - the wire format, the
//!    static descriptor of a resource kind, and the plain-object view of a resource
//! 2. **Conversion** ([`serialize`], [`unserialize`]) - pure, synchronous functions
//!    with no I/O and no hidden state
//! 3. **Walking** ([`Pager`]) - the only part that suspends, once per page, on the
//!    [`PageFetcher`] it was given
//!
//! Everything that crosses the network goes through the [`Transport`] seam, so the
//! same code runs against a real HTTP client or the in-memory
//! [`MockTransport`](mock::MockTransport).
//!
//! ```text
//! object ─► serialize ─► Document ─► Transport ─► Document ─► unserialize ─► Record(s)
//!
//! Pager: fetch ─► unserialize ─► emit records ─► follow links.next ─► fetch ...
//! ```
//!
//! ## Core Abstractions
//!
//! ### Serializing
//!
//! ```rust
//! use jsonapi_core::{serialize, ResourceSchema};
//! use serde_json::json;
//!
//! let people = ResourceSchema::new("Person").relationship("email", "Email");
//!
//! // Relationship values must carry an `id`; only the reference is written.
//! let doc = serialize(&people, &json!({"id": 41, "firstName": "Lindsey", "email": {"id": 33}}))
//!     .unwrap();
//! let json = serde_json::to_value(&doc).unwrap();
//! assert_eq!(json["data"]["relationships"]["email"]["data"], json!({"id": 33, "type": "Email"}));
//!
//! // A related object without an identifier cannot be referenced.
//! assert!(serialize(&people, &json!({"email": {"location": "Home"}})).is_err());
//! ```
//!
//! ### Unserializing
//!
//! The result is a sum type, so the shape of `data` is handled exhaustively:
//!
//! ```rust
//! use jsonapi_core::{unserialize, Document, Unserialized};
//! use serde_json::json;
//!
//! let doc: Document = serde_json::from_value(json!({
//!     "data": [{"type": "Person", "id": 12, "attributes": {"firstName": "John"}}],
//!     "links": {"next": "/people?page=2"}
//! })).unwrap();
//!
//! match unserialize(&doc).unwrap() {
//!     Unserialized::Empty => unreachable!(),
//!     Unserialized::Single(_) => unreachable!(),
//!     Unserialized::Many(page) => {
//!         assert_eq!(page.len(), 1);
//!         assert_eq!(page.next(), Some("/people?page=2"));
//!     }
//! }
//! ```
//!
//! ### Walking pages
//!
//! ```rust
//! use jsonapi_core::{Document, FnFetcher, JsonApiError, Pager};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetcher = FnFetcher::new(|url: String| async move {
//!         let body = if url == "/books" {
//!             json!({"data": [{"type": "books", "id": 1}], "links": {"next": "/books?page=2"}})
//!         } else {
//!             json!({"data": [{"type": "books", "id": 2}]})
//!         };
//!         Ok::<Document, JsonApiError>(serde_json::from_value(body).unwrap())
//!     });
//!
//!     let books = Pager::new(fetcher, "/books").try_collect().await.unwrap();
//!     assert_eq!(books.len(), 2);
//! }
//! ```
//!
//! ## Policies
//!
//! - **Missing includes**: [`IncludePolicy::Stub`] (default) turns a reference that is
//!   not side-loaded into `{id}`; [`IncludePolicy::Strict`] fails with
//!   [`JsonApiError::RelationNotIncluded`].
//! - **Depth**: included resources are resolved one level deep; their own relationships
//!   are not followed.
//! - **Identifiers**: kept exactly as sent, string or number ([`ResourceId`]).
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockTransport`](mock::MockTransport), an in-memory
//! transport with ordered, fluent expectations.

pub mod document;
pub mod error;
pub mod mock;
pub mod pager;
pub mod record;
pub mod schema;
pub mod serialize;
pub mod tracing;
pub mod transport;
pub mod unserialize;

// Re-export core types for convenience
pub use document::{
    Document, ErrorObject, Link, Links, PrimaryData, Relationship, RelationshipData, ResourceId,
    ResourceIdentifier, ResourceObject,
};
pub use error::JsonApiError;
pub use pager::{CancelHandle, FnFetcher, PageFetcher, Pager, PagerState};
pub use record::{Field, Page, Record, RecordBuilder, Relation, Unserialized};
pub use schema::ResourceSchema;
pub use serialize::{serialize, serialize_map, serialize_record};
pub use transport::{Method, Request, Response, Transport, JSONAPI_MEDIA_TYPE};
pub use unserialize::{unserialize, unserialize_with, IncludePolicy};
