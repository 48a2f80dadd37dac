//! # Domain Records
//!
//! A [`Record`] is the plain-object view of a resource: an optional `id` plus named
//! fields, where each field is either an attribute value or a resolved relationship.
//! Records are what the unserializer produces and what the paged iterator yields.
//! Callers that prefer their own structs convert with [`Record::deserialize`].
//!
//! Records are assembled with a [`RecordBuilder`], which fixes the merge order once:
//! `id`, then attributes, then relationships. A relationship overwrites an attribute of
//! the same name, and no attribute can overwrite `id`.
//!
//! The last rule departs from a plain right-biased merge, where an attribute named `id`
//! would replace the resource identifier. JSON:API reserves `id` for the identifier and
//! forbids it as an attribute name, so such an attribute is dropped instead.

use crate::document::{Link, Links, ResourceId};
use crate::error::JsonApiError;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::Deref;

/// One field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Value(Value),
    Relation(Relation),
}

impl Field {
    pub fn to_value(&self) -> Value {
        match self {
            Field::Value(value) => value.clone(),
            Field::Relation(relation) => relation.to_value(),
        }
    }
}

/// A resolved relationship field.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// The server sent `data: null`.
    Null,
    One(Box<Record>),
    Many(Vec<Record>),
}

impl Relation {
    pub fn to_value(&self) -> Value {
        match self {
            Relation::Null => Value::Null,
            Relation::One(record) => record.to_value(),
            Relation::Many(records) => Value::Array(records.iter().map(Record::to_value).collect()),
        }
    }
}

/// A resource as a plain object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    id: Option<ResourceId>,
    fields: BTreeMap<String, Field>,
}

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::new()
    }

    /// A record that only knows its identifier (the target was not side-loaded).
    pub fn stub(id: ResourceId) -> Self {
        Self {
            id: Some(id),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(Field::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        match self.fields.get(name) {
            Some(Field::Relation(relation)) => Some(relation),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// True when the record carries nothing but (at most) an identifier.
    pub fn is_stub(&self) -> bool {
        self.fields.is_empty()
    }

    /// The JSON object view: `{id?, ...attributes, ...relationships}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), id.to_value());
        }
        for (name, field) in &self.fields {
            map.insert(name.clone(), field.to_value());
        }
        Value::Object(map)
    }

    /// Converts the record into a caller-defined serde type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, JsonApiError> {
        Ok(serde_json::from_value(self.to_value())?)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Assembles a [`Record`] in a fixed order: id, attributes, relationships.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Option<ResourceId>) -> Self {
        self.record.id = id;
        self
    }

    /// Copies attributes verbatim. An attribute named `id` is ignored.
    pub fn attributes(mut self, attributes: Map<String, Value>) -> Self {
        for (name, value) in attributes {
            if name == "id" {
                continue;
            }
            self.record.fields.insert(name, Field::Value(value));
        }
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if name != "id" {
            self.record.fields.insert(name, Field::Value(value));
        }
        self
    }

    /// Sets a relationship field, replacing any attribute of the same name.
    pub fn relation(mut self, name: impl Into<String>, relation: Relation) -> Self {
        self.record.fields.insert(name.into(), Field::Relation(relation));
        self
    }

    pub fn relations<I>(self, relations: I) -> Self
    where
        I: IntoIterator<Item = (String, Relation)>,
    {
        relations
            .into_iter()
            .fold(self, |builder, (name, relation)| builder.relation(name, relation))
    }

    pub fn build(self) -> Record {
        self.record
    }
}

/// The result of unserializing a document, by shape of its primary data.
#[derive(Debug, Clone, PartialEq)]
pub enum Unserialized {
    /// `data` was absent or `null`.
    Empty,
    Single(Record),
    Many(Page),
}

impl Unserialized {
    pub fn is_empty(&self) -> bool {
        matches!(self, Unserialized::Empty)
    }

    pub fn into_single(self) -> Option<Record> {
        match self {
            Unserialized::Single(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_page(self) -> Option<Page> {
        match self {
            Unserialized::Many(page) => Some(page),
            _ => None,
        }
    }

    /// Flattens any shape into a list of records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Unserialized::Empty => Vec::new(),
            Unserialized::Single(record) => vec![record],
            Unserialized::Many(page) => page.records,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Unserialized::Empty => Value::Null,
            Unserialized::Single(record) => record.to_value(),
            Unserialized::Many(page) => Value::Array(page.iter().map(Record::to_value).collect()),
        }
    }
}

/// One page of a listing, with its pagination links kept out-of-band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    records: Vec<Record>,
    links: Links,
}

impl Page {
    pub fn new(records: Vec<Record>, links: Links) -> Self {
        Self { records, links }
    }

    pub fn next(&self) -> Option<&str> {
        self.links.next.as_ref().map(Link::href)
    }

    pub fn prev(&self) -> Option<&str> {
        self.links.prev.as_ref().map(Link::href)
    }

    pub fn first(&self) -> Option<&str> {
        self.links.first.as_ref().map(Link::href)
    }

    pub fn last(&self) -> Option<&str> {
        self.links.last.as_ref().map(Link::href)
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Splits the page into its records and the `next` link, if any.
    pub fn into_parts(self) -> (Vec<Record>, Option<String>) {
        let next = self.links.next.map(|link| link.href().to_string());
        (self.records, next)
    }
}

impl Deref for Page {
    type Target = [Record];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl IntoIterator for Page {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_lets_relationships_win_over_attributes() {
        let attrs = json!({"email": "old@example.com", "name": "John"});
        let record = Record::builder()
            .id(Some(7.into()))
            .attributes(attrs.as_object().cloned().unwrap())
            .relation("email", Relation::One(Box::new(Record::stub(3.into()))))
            .build();

        assert_eq!(
            record.to_value(),
            json!({"id": 7, "name": "John", "email": {"id": 3}})
        );
        assert!(record.attribute("email").is_none());
        assert!(matches!(record.relation("email"), Some(Relation::One(_))));
    }

    #[test]
    fn builder_never_lets_an_attribute_replace_the_id() {
        let record = Record::builder()
            .id(Some("abc".into()))
            .attribute("id", json!("forged"))
            .build();
        assert_eq!(record.id(), Some(&ResourceId::from("abc")));
        assert_eq!(record.to_value(), json!({"id": "abc"}));
    }

    #[test]
    fn record_deserializes_into_caller_types() {
        #[derive(serde::Deserialize)]
        struct Person {
            id: u64,
            #[serde(rename = "firstName")]
            first_name: String,
        }

        let record = Record::builder()
            .id(Some(12.into()))
            .attribute("firstName", json!("John"))
            .build();
        let person: Person = record.deserialize().unwrap();
        assert_eq!(person.id, 12);
        assert_eq!(person.first_name, "John");
    }

    #[test]
    fn page_exposes_links_out_of_band() {
        let links = Links {
            next: Some("/books?page=2".into()),
            ..Default::default()
        };
        let page = Page::new(vec![Record::stub(1.into())], links);
        assert_eq!(page.len(), 1);
        assert_eq!(page.next(), Some("/books?page=2"));
        assert_eq!(page.prev(), None);
        let (records, next) = page.into_parts();
        assert_eq!(records.len(), 1);
        assert_eq!(next.as_deref(), Some("/books?page=2"));
    }
}
