//! # Wire Document
//!
//! Serde model of the JSON envelope exchanged with a JSON:API server. Only the fields
//! the serializer, unserializer and pager rely on are typed; everything else that a
//! server may send (`meta`, per-object `links`) is carried as raw JSON.
//!
//! Two distinctions matter and are encoded in the types:
//!
//! - a top-level `data` that is absent or `null` versus one that is an (empty) array,
//! - a relationship whose `data` key is missing versus one whose `data` is `null`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a resource. Passed through exactly as the server or caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    String(String),
    Number(Number),
}

impl ResourceId {
    /// Converts a JSON value into an identifier. `null` is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ResourceId::String(s.clone())),
            Value::Number(n) => Some(ResourceId::Number(n.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ResourceId::String(s) => Value::String(s.clone()),
            ResourceId::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::String(s) => f.write_str(s),
            ResourceId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::String(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::String(value)
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Number(value.into())
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        ResourceId::Number(value.into())
    }
}

impl From<i32> for ResourceId {
    fn from(value: i32) -> Self {
        ResourceId::Number(value.into())
    }
}

impl From<u32> for ResourceId {
    fn from(value: u32) -> Self {
        ResourceId::Number(value.into())
    }
}

/// Top-level JSON:API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// `None` when the key is absent or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Document {
    /// A document whose primary data is a single resource object.
    pub fn single(resource: ResourceObject) -> Self {
        Self {
            data: Some(PrimaryData::One(resource)),
            ..Default::default()
        }
    }

    /// A document whose primary data is a collection.
    pub fn many(resources: Vec<ResourceObject>) -> Self {
        Self {
            data: Some(PrimaryData::Many(resources)),
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Looks up a side-loaded resource by its `(type, id)` pair.
    pub fn find_included(&self, resource_type: &str, id: &ResourceId) -> Option<&ResourceObject> {
        self.included
            .iter()
            .find(|r| r.resource_type == resource_type && r.id.as_ref() == Some(id))
    }
}

/// The `data` member: one resource object or an array of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<ResourceObject>),
    One(ResourceObject),
}

/// One entity on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }
}

/// A relationship entry on a resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// `None` means the `data` key is missing (e.g. only `links` were sent);
    /// `Some(RelationshipData::Null)` means the relationship is explicitly empty.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub data: Option<RelationshipData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Relationship {
    pub fn with_data(data: RelationshipData) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }
}

// Only called when the key is present, so `null` lands in `Some(Null)`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<RelationshipData>, D::Error>
where
    D: Deserializer<'de>,
{
    RelationshipData::deserialize(deserializer).map(Some)
}

/// Resource linkage of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Null,
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// A `{type, id}` pointer to another resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: ResourceId) -> Self {
        Self {
            id,
            resource_type: resource_type.into(),
            meta: None,
        }
    }
}

/// Pagination and self links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

/// A link is either a bare URL or an object with an `href`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    Href(String),
    Object {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Value>,
    },
}

impl Link {
    pub fn href(&self) -> &str {
        match self {
            Link::Href(href) => href,
            Link::Object { href, .. } => href,
        }
    }
}

impl From<&str> for Link {
    fn from(value: &str) -> Self {
        Link::Href(value.to_string())
    }
}

/// One entry of the top-level `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relationship_distinguishes_missing_data_from_null() {
        let rel: Relationship =
            serde_json::from_value(json!({"links": {"related": "http://localhost/email"}})).unwrap();
        assert_eq!(rel.data, None);

        let rel: Relationship = serde_json::from_value(json!({"data": null})).unwrap();
        assert_eq!(rel.data, Some(RelationshipData::Null));

        assert_eq!(serde_json::to_value(&rel).unwrap(), json!({"data": null}));
    }

    #[test]
    fn relationship_data_accepts_one_or_many() {
        let one: RelationshipData = serde_json::from_value(json!({"type": "Email", "id": 12})).unwrap();
        assert_eq!(
            one,
            RelationshipData::One(ResourceIdentifier::new("Email", 12.into()))
        );

        let many: RelationshipData =
            serde_json::from_value(json!([{"type": "Email", "id": "a"}])).unwrap();
        assert_eq!(
            many,
            RelationshipData::Many(vec![ResourceIdentifier::new("Email", "a".into())])
        );
    }

    #[test]
    fn null_and_missing_data_both_read_as_none() {
        let doc: Document = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(doc.data.is_none());
        let doc: Document = serde_json::from_value(json!({"meta": {"count": 0}})).unwrap();
        assert!(doc.data.is_none());
        let doc: Document = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(doc.data, Some(PrimaryData::Many(vec![])));
    }

    #[test]
    fn ids_keep_their_json_type() {
        let obj: ResourceObject = serde_json::from_value(json!({"type": "Person", "id": 12})).unwrap();
        assert_eq!(obj.id, Some(ResourceId::from(12u64)));
        let obj: ResourceObject =
            serde_json::from_value(json!({"type": "Person", "id": "12"})).unwrap();
        assert_eq!(obj.id, Some(ResourceId::from("12")));
        assert_eq!(serde_json::to_value(&obj).unwrap(), json!({"type": "Person", "id": "12"}));
    }

    #[test]
    fn links_accept_strings_and_objects() {
        let links: Links = serde_json::from_value(json!({
            "next": "/books?page=2",
            "prev": {"href": "/books?page=0", "meta": {"n": 0}}
        }))
        .unwrap();
        assert_eq!(links.next.as_ref().map(Link::href), Some("/books?page=2"));
        assert_eq!(links.prev.as_ref().map(Link::href), Some("/books?page=0"));
        assert!(links.first.is_none());
    }
}
