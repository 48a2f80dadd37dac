//! # Query Builder
//!
//! A [`Query`] describes *what* to fetch: filters, side-loaded relationships, sparse
//! fieldsets, sort order and pagination. It is plain data. Nothing happens until it is
//! handed to a [`Collection`](crate::Collection) operation, or executed explicitly through
//! a [`QueryBuilder`] obtained from [`Collection::query`](crate::Collection::query).
//!
//! ```rust
//! use jsonapi_client::{Direction, Query};
//!
//! let query = Query::new()
//!     .filter("author", "9")
//!     .include("author")
//!     .include("publisher")
//!     .fields("books", ["title", "isbn"])
//!     .sort("published", Direction::Desc)
//!     .page("size", 20);
//!
//! assert_eq!(
//!     query.pairs(),
//!     vec![
//!         ("include".to_string(), "author,publisher".to_string()),
//!         ("fields[books]".to_string(), "title,isbn".to_string()),
//!         ("filter[author]".to_string(), "9".to_string()),
//!         ("sort".to_string(), "-published".to_string()),
//!         ("page[size]".to_string(), "20".to_string()),
//!     ]
//! );
//! ```

use crate::collection::Collection;
use jsonapi_core::{JsonApiError, Pager, ResourceId, Transport, Unserialized};
use std::fmt;
use url::form_urlencoded;

/// Sort direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Fetch criteria, turned into a query string.
///
/// Keyed parameters (`filter`, `fields`, `page`, `param`) keep their first position and
/// take the last value set for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    includes: Vec<String>,
    fields: Vec<(String, Vec<String>)>,
    filters: Vec<(String, String)>,
    sort: Vec<(String, Direction)>,
    page: Vec<(String, String)>,
    params: Vec<(String, String)>,
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filter[name]=value`
    pub fn filter(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        upsert(&mut self.filters, name.into(), value.to_string());
        self
    }

    /// Side-loads a relationship path; repeated calls are comma-joined.
    pub fn include(mut self, relationship: impl Into<String>) -> Self {
        let relationship = relationship.into();
        if !self.includes.contains(&relationship) {
            self.includes.push(relationship);
        }
        self
    }

    /// Sparse fieldset, `fields[type]=a,b`.
    pub fn fields<I, S>(mut self, resource_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        upsert(&mut self.fields, resource_type.into(), fields);
        self
    }

    /// Adds a sort key. Keys apply in the order they were added.
    pub fn sort(mut self, field: impl Into<String>, direction: Direction) -> Self {
        upsert(&mut self.sort, field.into(), direction);
        self
    }

    /// `page[key]=value`, e.g. `page("number", 2)`.
    pub fn page(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        upsert(&mut self.page, key.into(), value.to_string());
        self
    }

    /// Any other top-level parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        upsert(&mut self.params, key.into(), value.to_string());
        self
    }

    pub fn has_page(&self, key: &str) -> bool {
        self.page.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// The query as unencoded key/value pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if !self.includes.is_empty() {
            pairs.push(("include".to_string(), self.includes.join(",")));
        }
        for (resource_type, fields) in &self.fields {
            pairs.push((format!("fields[{resource_type}]"), fields.join(",")));
        }
        for (name, value) in &self.filters {
            pairs.push((format!("filter[{name}]"), value.clone()));
        }
        if !self.sort.is_empty() {
            let keys: Vec<String> = self
                .sort
                .iter()
                .map(|(field, direction)| match direction {
                    Direction::Asc => field.clone(),
                    Direction::Desc => format!("-{field}"),
                })
                .collect();
            pairs.push(("sort".to_string(), keys.join(",")));
        }
        for (key, value) in &self.page {
            pairs.push((format!("page[{key}]"), value.clone()));
        }
        pairs.extend(self.params.iter().cloned());

        pairs
    }

    /// Form-urlencoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }

    /// Appends the query string to `path`.
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else if path.contains('?') {
            format!("{path}&{query}")
        } else {
            format!("{path}?{query}")
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// A [`Query`] bound to the collection it will run against.
///
/// Building never performs I/O; one of the `execute_*` methods or
/// [`into_pager`](Self::into_pager) does.
pub struct QueryBuilder<'a, T> {
    collection: &'a Collection<T>,
    query: Query,
}

impl<'a, T: Transport + 'static> QueryBuilder<'a, T> {
    pub(crate) fn new(collection: &'a Collection<T>) -> Self {
        Self {
            collection,
            query: Query::new(),
        }
    }

    pub fn filter(self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.map(|q| q.filter(name, value))
    }

    pub fn include(self, relationship: impl Into<String>) -> Self {
        self.map(|q| q.include(relationship))
    }

    pub fn fields<I, S>(self, resource_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map(|q| q.fields(resource_type, fields))
    }

    pub fn sort(self, field: impl Into<String>, direction: Direction) -> Self {
        self.map(|q| q.sort(field, direction))
    }

    pub fn page(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.map(|q| q.page(key, value))
    }

    pub fn param(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.map(|q| q.param(key, value))
    }

    /// The query built so far.
    pub fn build(self) -> Query {
        self.query
    }

    pub async fn execute_one(self, id: impl Into<ResourceId>) -> Result<Unserialized, JsonApiError> {
        self.collection.one(id, &self.query).await
    }

    pub async fn execute_many(self) -> Result<Unserialized, JsonApiError> {
        self.collection.many(&self.query).await
    }

    pub fn into_pager(self) -> Pager<Collection<T>> {
        self.collection.all(&self.query)
    }

    fn map(mut self, f: impl FnOnce(Query) -> Query) -> Self {
        self.query = f(self.query);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_string() {
        let query = Query::new();
        assert!(query.is_empty());
        assert_eq!(query.to_query_string(), "");
        assert_eq!(query.apply_to("/books"), "/books");
    }

    #[test]
    fn brackets_and_commas_are_encoded() {
        let query = Query::new().filter("title", "War & Peace").include("author");
        assert_eq!(
            query.to_query_string(),
            "include=author&filter%5Btitle%5D=War+%26+Peace"
        );
    }

    #[test]
    fn repeated_keys_keep_position_and_take_last_value() {
        let query = Query::new()
            .page("number", 1)
            .page("size", 10)
            .page("number", 3)
            .include("author")
            .include("author");
        assert_eq!(
            query.pairs(),
            vec![
                ("include".to_string(), "author".to_string()),
                ("page[number]".to_string(), "3".to_string()),
                ("page[size]".to_string(), "10".to_string()),
            ]
        );
        assert!(query.has_page("size"));
        assert!(!query.has_page("offset"));
    }

    #[test]
    fn multiple_sort_keys_are_comma_joined() {
        let query = Query::new()
            .sort("author", Direction::Asc)
            .sort("published", Direction::Desc);
        assert_eq!(query.pairs(), vec![("sort".to_string(), "author,-published".to_string())]);
    }

    #[test]
    fn apply_to_respects_an_existing_query() {
        let query = Query::new().param("lang", "en");
        assert_eq!(query.apply_to("/books?x=1"), "/books?x=1&lang=en");
        assert_eq!(query.apply_to("/books"), "/books?lang=en");
    }
}
