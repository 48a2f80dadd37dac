//! # Errors
//!
//! This module defines the single error type shared by the serializer, the unserializer,
//! the paged iterator and the transport seam. Keeping one enum means a caller walking a
//! multi-page listing matches on the same variants it sees from a one-shot fetch.

use crate::document::{ErrorObject, ResourceId};

/// Errors raised while converting, fetching or walking JSON:API documents.
#[derive(Debug, thiserror::Error)]
pub enum JsonApiError {
    /// The document carried a non-empty `errors` array. Holds the first error's
    /// human-readable text and the full list as sent by the server.
    #[error("{detail}")]
    Document {
        detail: String,
        errors: Vec<ErrorObject>,
    },

    /// The input could not be expressed as a resource object (e.g. a related
    /// object without an `id`). Raised before any I/O happens.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Strict include policy only: a relationship references a resource that is
    /// absent from `included`.
    #[error("Relationship `{field}` references {resource_type}/{id} which is not included")]
    RelationNotIncluded {
        field: String,
        resource_type: String,
        id: ResourceId,
    },

    /// Opaque failure reported by the transport collaborator, passed through unchanged.
    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The response body is not JSON.
    #[error("The JSON:API response contains an invalid content type {0:?}")]
    ContentType(Option<String>),

    /// The server answered 404.
    #[error("The JSON:API resource was not found: {0}")]
    NotFound(String),

    /// The server answered with a status the operation does not accept.
    #[error("The server sent an invalid response: {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The body was JSON but not a well-formed document.
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be built from the configured base and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl JsonApiError {
    /// Wraps any transport failure without interpreting it.
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        JsonApiError::Transport(Box::new(error))
    }

    /// Builds a [`JsonApiError::Document`] from a server `errors` array.
    ///
    /// The message is the first error's `detail`, falling back to its `title`.
    pub fn from_error_objects(errors: Vec<ErrorObject>) -> Self {
        let detail = errors
            .first()
            .and_then(|e| e.detail.clone().or_else(|| e.title.clone()))
            .unwrap_or_else(|| "unknown error".to_string());
        JsonApiError::Document { detail, errors }
    }
}
