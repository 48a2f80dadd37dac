use jsonapi_core::ResourceSchema;
use serde::{Deserialize, Serialize};

/// Resource type of authors on the wire.
pub const AUTHOR_TYPE: &str = "authors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub born: Option<u16>,
    /// Present when the server sends the relationship; stubs unless side-loaded.
    #[serde(default)]
    pub books: Option<Vec<BookRef>>,
}

impl Author {
    pub fn schema() -> ResourceSchema {
        ResourceSchema::new(AUTHOR_TYPE).relationship("books", crate::model::BOOK_TYPE)
    }
}

/// Reference to an author from another resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AuthorRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Reference to a book from an author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Payload for creating a new author.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born: Option<u16>,
}
