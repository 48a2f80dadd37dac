//! # Book Client
//!
//! Provides a high-level API for the `books` collection.
//! It wraps a `Collection` and exposes book-specific methods on top of the
//! inherited [`TypedCollection`] operations.
use crate::error::LibraryError;
use crate::model::{Book, BookCreate, BookUpdate};
use async_trait::async_trait;
use jsonapi_client::clients::into_model;
use jsonapi_client::{Collection, Direction, JsonApiError, Query, Transport, TypedCollection, Unserialized};
use tracing::{debug, instrument};

/// Client for the `books` collection.
pub struct BookClient<T> {
    inner: Collection<T>,
}

impl<T> Clone for BookClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Transport + 'static> BookClient<T> {
    pub fn new(inner: Collection<T>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport + 'static> TypedCollection<Book> for BookClient<T> {
    type Transport = T;
    type Error = LibraryError;

    fn inner(&self) -> &Collection<T> {
        &self.inner
    }

    fn map_error(e: JsonApiError) -> Self::Error {
        e.into()
    }
}

impl<T: Transport + 'static> BookClient<T> {
    #[instrument(skip(self))]
    pub async fn create_book(&self, params: BookCreate) -> Result<Book, LibraryError> {
        debug!("Sending request");
        let created = self.inner.create(&params).await?;
        single(created, "created book")
    }

    #[instrument(skip(self))]
    pub async fn update_book(&self, update: BookUpdate) -> Result<Option<Book>, LibraryError> {
        debug!("Sending request");
        match self.inner.update(&update).await? {
            // 204: the server kept our representation.
            Unserialized::Empty => Ok(None),
            other => single(other, "updated book").map(Some),
        }
    }

    /// Every book by one author, newest first, with the author side-loaded.
    #[instrument(skip(self))]
    pub async fn by_author(&self, author_id: &str) -> Result<Vec<Book>, LibraryError> {
        debug!("Sending request");
        let records = self
            .inner
            .query()
            .filter("author", author_id)
            .include("author")
            .sort("published", Direction::Desc)
            .into_pager()
            .try_collect()
            .await?;
        records
            .iter()
            .map(|record| into_model(record).map_err(LibraryError::from))
            .collect()
    }

    /// One page of books matching `query`, plus the link to the next page.
    #[instrument(skip(self))]
    pub async fn page(&self, query: &Query) -> Result<(Vec<Book>, Option<String>), LibraryError> {
        debug!("Sending request");
        let page = match self.inner.many(query).await? {
            Unserialized::Many(page) => page,
            Unserialized::Single(record) => return Ok((vec![into_model(&record)?], None)),
            Unserialized::Empty => return Ok((Vec::new(), None)),
        };
        let (records, next) = page.into_parts();
        let books = records
            .iter()
            .map(into_model)
            .collect::<Result<Vec<Book>, _>>()?;
        Ok((books, next))
    }
}

fn single(result: Unserialized, what: &str) -> Result<Book, LibraryError> {
    match result {
        Unserialized::Single(record) => Ok(into_model(&record)?),
        _ => Err(LibraryError::CommunicationError(format!(
            "expected the {what} in the response"
        ))),
    }
}
