//! Error types for the library clients.

use jsonapi_core::JsonApiError;
use thiserror::Error;

/// Errors that can occur during library operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LibraryError {
    /// The requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A book refers to an author the API does not know.
    #[error("Unknown author: {0}")]
    UnknownAuthor(String),

    /// The payload could not be sent as a resource.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The server answered with an error document.
    #[error("Server error: {0}")]
    ServerError(String),

    /// The request could not be completed (network, content type, malformed body).
    #[error("Communication error: {0}")]
    CommunicationError(String),
}

impl From<JsonApiError> for LibraryError {
    fn from(e: JsonApiError) -> Self {
        match e {
            JsonApiError::NotFound(url) => LibraryError::NotFound(url),
            JsonApiError::Validation(msg) => LibraryError::ValidationError(msg),
            JsonApiError::Document { detail, .. } => LibraryError::ServerError(detail),
            other => LibraryError::CommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_by_kind() {
        assert_eq!(
            LibraryError::from(JsonApiError::NotFound("books/1".into())),
            LibraryError::NotFound("books/1".into())
        );
        assert_eq!(
            LibraryError::from(JsonApiError::from_error_objects(vec![])),
            LibraryError::ServerError("unknown error".into())
        );
        assert!(matches!(
            LibraryError::from(JsonApiError::ContentType(Some("text/html".into()))),
            LibraryError::CommunicationError(_)
        ));
    }
}
