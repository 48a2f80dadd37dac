//! # Library Orchestration
//!
//! [`Library`] wires the typed clients together over one shared transport and adds the
//! workflows that span more than one resource kind.
//!
//! **Key Responsibilities:**
//! 1. **Client Creation** - one [`Client`] hands out the `books` and `authors` collections
//! 2. **Configuration** - include policy and page size come from
//!    [`ClientConfig`](jsonapi_client::ClientConfig)
//! 3. **Cross-resource checks** - a book is only published for an author that exists
//!
//! ```rust,ignore
//! let library = Library::connect(ClientConfig::from_env()?)?;
//! let book = library.publish(BookCreate::new("Dune", "9").published(1965)).await?;
//! for book in library.catalogue().await? {
//!     println!("{}", book.title);
//! }
//! ```

use crate::clients::{AuthorClient, BookClient};
use crate::error::LibraryError;
use crate::model::{Author, Book, BookCreate};
use jsonapi_client::{Client, ResourceId, Transport, TypedCollection};
use tracing::{info, instrument, warn};

/// The library API, as one object.
pub struct Library<T> {
    /// Client for the `books` collection
    pub books: BookClient<T>,

    /// Client for the `authors` collection
    pub authors: AuthorClient<T>,
}

impl<T: Transport + 'static> Library<T> {
    /// Builds the typed clients on top of `client`.
    pub fn new(client: Client<T>) -> Self {
        let books = BookClient::new(client.collection(Book::schema()));
        let authors = AuthorClient::new(client.collection(Author::schema()));
        Self { books, authors }
    }

    /// Creates a book after checking that its author exists.
    #[instrument(skip(self))]
    pub async fn publish(&self, params: BookCreate) -> Result<Book, LibraryError> {
        let author_id = params.author.id.clone();
        if self.authors.get(ResourceId::from(author_id.as_str())).await?.is_none() {
            warn!(%author_id, "Refusing to publish for an unknown author");
            return Err(LibraryError::UnknownAuthor(author_id));
        }

        let book = self.books.create_book(params).await?;
        info!(book_id = %book.id, %author_id, "Book published");
        Ok(book)
    }

    /// Every book, across all pages.
    #[instrument(skip(self))]
    pub async fn catalogue(&self) -> Result<Vec<Book>, LibraryError> {
        let books = self.books.list().await?;
        info!(count = books.len(), "Catalogue loaded");
        Ok(books)
    }

    /// An author and the books they wrote.
    #[instrument(skip(self))]
    pub async fn bibliography(&self, author_id: &str) -> Result<(Author, Vec<Book>), LibraryError> {
        let author = self
            .authors
            .get(ResourceId::from(author_id))
            .await?
            .ok_or_else(|| LibraryError::NotFound(format!("author {author_id}")))?;
        let books = self.books.by_author(author_id).await?;
        Ok((author, books))
    }

    /// Removes a book from the catalogue.
    #[instrument(skip(self))]
    pub async fn retire(&self, book_id: &str) -> Result<(), LibraryError> {
        self.books.delete(ResourceId::from(book_id)).await?;
        info!(%book_id, "Book retired");
        Ok(())
    }
}

#[cfg(feature = "http")]
impl Library<jsonapi_client::HttpTransport> {
    /// A library over HTTP.
    pub fn connect(config: jsonapi_client::ClientConfig) -> Result<Self, LibraryError> {
        Ok(Self::new(Client::connect(config)?))
    }
}
