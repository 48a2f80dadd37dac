//! Typed wrappers around [`Collection`](crate::Collection).

pub mod typed_collection;

pub use typed_collection::*;
