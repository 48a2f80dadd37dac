//! Typed clients for the library resources.

pub mod author_client;
pub mod book_client;

pub use author_client::*;
pub use book_client::*;
