//! # Serializer
//!
//! Turns a plain object into a single-resource [`Document`] using a [`ResourceSchema`].
//!
//! Every field of the object lands in exactly one place:
//!
//! - `id` is copied to `data.id` untouched (string or number, `null` means absent),
//! - fields the schema names as relationships become resource linkage
//!   (`{data: {id, type}}`, `{data: [...]}` or `{data: null}`),
//! - everything else is copied verbatim into `data.attributes`.
//!
//! Only references are written for relationships, never nested bodies, so every related
//! object must carry an `id`. `attributes` and `relationships` are only created when at
//! least one field goes there.
//!
//! A struct field of type `Option<_>` that is `None` serializes as `null`; on a
//! relationship field that is an explicit clear. Mark such fields with
//! `#[serde(skip_serializing_if = "Option::is_none")]` to leave the relationship alone.

use crate::document::{
    Document, Relationship, RelationshipData, ResourceId, ResourceIdentifier, ResourceObject,
};
use crate::error::JsonApiError;
use crate::record::Record;
use crate::schema::ResourceSchema;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Serializes any serde value that renders as a JSON object.
///
/// # Example
///
/// ```rust
/// use jsonapi_core::{serialize, ResourceSchema};
/// use serde_json::json;
///
/// let books = ResourceSchema::new("books").relationship("author", "author");
/// let doc = serialize(&books, &json!({"title": "X", "author": {"id": 3}})).unwrap();
///
/// assert_eq!(
///     serde_json::to_value(&doc).unwrap(),
///     json!({"data": {
///         "type": "books",
///         "attributes": {"title": "X"},
///         "relationships": {"author": {"data": {"id": 3, "type": "author"}}}
///     }})
/// );
/// ```
pub fn serialize<T>(schema: &ResourceSchema, object: &T) -> Result<Document, JsonApiError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(object)? {
        Value::Object(map) => serialize_map(schema, &map),
        other => Err(JsonApiError::Validation(format!(
            "A {} resource must serialize to an object, got {}",
            schema.resource_type(),
            json_kind(&other)
        ))),
    }
}

/// Serializes a [`Record`], e.g. one previously produced by the unserializer.
pub fn serialize_record(schema: &ResourceSchema, record: &Record) -> Result<Document, JsonApiError> {
    serialize(schema, record)
}

/// Serializes an already-built JSON object.
pub fn serialize_map(
    schema: &ResourceSchema,
    object: &Map<String, Value>,
) -> Result<Document, JsonApiError> {
    let mut resource = ResourceObject::new(schema.resource_type());

    for (name, value) in object {
        if name == "id" {
            resource.id = serialize_id(value)?;
            continue;
        }

        if let Some(related_type) = schema.related_type(name) {
            let data = serialize_linkage(name, related_type, value)?;
            resource
                .relationships
                .get_or_insert_with(BTreeMap::new)
                .insert(name.clone(), Relationship::with_data(data));
            continue;
        }

        resource
            .attributes
            .get_or_insert_with(Map::new)
            .insert(name.clone(), value.clone());
    }

    Ok(Document::single(resource))
}

fn serialize_id(value: &Value) -> Result<Option<ResourceId>, JsonApiError> {
    if value.is_null() {
        return Ok(None);
    }
    ResourceId::from_value(value).map(Some).ok_or_else(|| {
        JsonApiError::Validation(format!(
            "Resource ID must be a string or a number, got {}",
            json_kind(value)
        ))
    })
}

fn serialize_linkage(
    field: &str,
    related_type: &str,
    value: &Value,
) -> Result<RelationshipData, JsonApiError> {
    match value {
        Value::Null => Ok(RelationshipData::Null),
        Value::Array(items) => items
            .iter()
            .map(|item| serialize_related(field, related_type, item))
            .collect::<Result<Vec<_>, _>>()
            .map(RelationshipData::Many),
        Value::Object(_) => serialize_related(field, related_type, value).map(RelationshipData::One),
        other => Err(JsonApiError::Validation(format!(
            "Relationship `{field}` must be an object, an array or null, got {}",
            json_kind(other)
        ))),
    }
}

fn serialize_related(
    field: &str,
    related_type: &str,
    value: &Value,
) -> Result<ResourceIdentifier, JsonApiError> {
    value
        .get("id")
        .and_then(ResourceId::from_value)
        .map(|id| ResourceIdentifier::new(related_type, id))
        .ok_or_else(|| {
            JsonApiError::Validation(format!("Related resource `{field}` must have an ID."))
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
