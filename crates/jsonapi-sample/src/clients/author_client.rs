//! # Author Client
//!
//! Provides a high-level API for the `authors` collection.
use crate::error::LibraryError;
use crate::model::{Author, AuthorCreate};
use async_trait::async_trait;
use jsonapi_client::clients::into_model;
use jsonapi_client::{Collection, JsonApiError, Query, Transport, TypedCollection, Unserialized};
use tracing::{debug, instrument};

/// Client for the `authors` collection.
pub struct AuthorClient<T> {
    inner: Collection<T>,
}

impl<T> Clone for AuthorClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Transport + 'static> AuthorClient<T> {
    pub fn new(inner: Collection<T>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_author(&self, params: AuthorCreate) -> Result<Author, LibraryError> {
        debug!("Sending request");
        match self.inner.create(&params).await? {
            Unserialized::Single(record) => Ok(into_model(&record)?),
            _ => Err(LibraryError::CommunicationError(
                "expected the created author in the response".to_string(),
            )),
        }
    }

    /// An author with their books side-loaded. `None` if the author does not exist.
    #[instrument(skip(self))]
    pub async fn with_books(&self, id: &str) -> Result<Option<Author>, LibraryError> {
        debug!("Sending request");
        match self.inner.one(id, &Query::new().include("books")).await {
            Ok(Unserialized::Single(record)) => Ok(Some(into_model(&record)?)),
            Ok(_) | Err(JsonApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<T: Transport + 'static> TypedCollection<Author> for AuthorClient<T> {
    type Transport = T;
    type Error = LibraryError;

    fn inner(&self) -> &Collection<T> {
        &self.inner
    }

    fn map_error(e: JsonApiError) -> Self::Error {
        e.into()
    }
}
