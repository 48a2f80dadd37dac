//! # Library Sample
//!
//! A small client for a book catalogue API, built on `jsonapi-client`.
//! This library exposes the modules of the demo for integration testing.

pub mod clients;
pub mod error;
pub mod library;
pub mod model;

pub use error::LibraryError;
pub use library::Library;
