//! Plain data structures for the library API, with the schema of each resource kind.

pub mod author;
pub mod book;

pub use author::*;
pub use book::*;
