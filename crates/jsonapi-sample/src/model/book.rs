use crate::model::AuthorRef;
use jsonapi_core::ResourceSchema;
use serde::{Deserialize, Serialize};

/// Resource type of books on the wire.
pub const BOOK_TYPE: &str = "books";

/// A book as returned by the API.
///
/// `author` is a relationship: when the server side-loads the author it carries the
/// name too, otherwise only the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub published: Option<u16>,
    #[serde(default)]
    pub author: Option<AuthorRef>,
}

impl Book {
    pub fn schema() -> ResourceSchema {
        ResourceSchema::new(BOOK_TYPE).relationship("author", crate::model::AUTHOR_TYPE)
    }
}

/// Payload for creating a new book.
#[derive(Debug, Clone, Serialize)]
pub struct BookCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<u16>,
    pub author: AuthorRef,
}

impl BookCreate {
    pub fn new(title: impl Into<String>, author_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            isbn: None,
            published: None,
            author: AuthorRef::new(author_id),
        }
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn published(mut self, year: u16) -> Self {
        self.published = Some(year);
        self
    }
}

/// Payload for updating an existing book. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorRef>,
}

impl BookUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
