//! # Resource Schema
//!
//! A [`ResourceSchema`] is the static descriptor of one resource kind: its JSON:API
//! `type` and which of its fields are relationships (and to what type they point).
//! The serializer needs it to partition an object's fields; the facade hands the same
//! value to every operation on a collection.
//!
//! Schemas are not validated when built. A relationship field missing from the schema
//! is simply written as an attribute, and nothing fails until a related value without
//! an identifier is actually serialized.

use std::collections::BTreeMap;

/// Type name plus `field -> related type` mapping for one resource kind.
///
/// # Example
///
/// ```rust
/// use jsonapi_core::ResourceSchema;
///
/// let books = ResourceSchema::new("books")
///     .relationship("author", "author")
///     .relationship("chapters", "chapter");
///
/// assert_eq!(books.resource_type(), "books");
/// assert_eq!(books.related_type("author"), Some("author"));
/// assert!(!books.is_relationship("title"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    resource_type: String,
    relationships: BTreeMap<String, String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            relationships: BTreeMap::new(),
        }
    }

    /// Declares `field` as a relationship to resources of `related_type`.
    pub fn relationship(mut self, field: impl Into<String>, related_type: impl Into<String>) -> Self {
        self.relationships.insert(field.into(), related_type.into());
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn related_type(&self, field: &str) -> Option<&str> {
        self.relationships.get(field).map(String::as_str)
    }

    pub fn is_relationship(&self, field: &str) -> bool {
        self.relationships.contains_key(field)
    }

    pub fn relationships(&self) -> impl Iterator<Item = (&str, &str)> {
        self.relationships
            .iter()
            .map(|(field, related)| (field.as_str(), related.as_str()))
    }
}
