//! # Unserializer
//!
//! Turns a [`Document`] back into [`Record`]s, resolving relationship references against
//! the document's `included` set.
//!
//! ## Resolution rules
//!
//! - A non-empty `errors` array wins over everything: the call fails with
//!   [`JsonApiError::Document`] and `data` is never read.
//! - `data` absent or `null` gives [`Unserialized::Empty`]; an array (even an empty one)
//!   gives [`Unserialized::Many`] with the document's pagination links attached to the
//!   [`Page`]; an object gives [`Unserialized::Single`].
//! - A reference found in `included` (matched on the `(type, id)` pair) becomes
//!   `{id, ...attributes}`. Only one level is resolved: the included resource's own
//!   relationships are not followed, so cyclic graphs cannot cause unbounded work.
//! - A reference missing from `included` becomes a stub `{id}` under
//!   [`IncludePolicy::Stub`], or fails with [`JsonApiError::RelationNotIncluded`] under
//!   [`IncludePolicy::Strict`].
//! - A relationship without a `data` key (only `links`, say) is left out of the record;
//!   only an explicit `data: null` produces a [`Relation::Null`] field.

use crate::document::{
    Document, PrimaryData, RelationshipData, ResourceId, ResourceIdentifier, ResourceObject,
};
use crate::error::JsonApiError;
use crate::record::{Page, Record, RecordBuilder, Relation, Unserialized};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// What to do with a relationship reference that has no match in `included`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludePolicy {
    /// Emit a stub record holding only the identifier.
    #[default]
    Stub,
    /// Fail with [`JsonApiError::RelationNotIncluded`].
    Strict,
}

impl FromStr for IncludePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(IncludePolicy::Stub),
            "strict" => Ok(IncludePolicy::Strict),
            other => Err(format!(
                "unknown include policy `{other}` (expected `stub` or `strict`)"
            )),
        }
    }
}

/// Unserializes with the default [`IncludePolicy::Stub`].
///
/// # Example
///
/// ```rust
/// use jsonapi_core::{unserialize, Document, Unserialized};
/// use serde_json::json;
///
/// let doc: Document = serde_json::from_value(json!({
///     "data": {"type": "Person", "id": 41, "attributes": {"firstName": "Lindsey"},
///              "relationships": {"email": {"data": {"type": "Email", "id": 33}}}},
///     "included": [{"type": "Email", "id": 33, "attributes": {"location": "Home"}}]
/// })).unwrap();
///
/// let person = unserialize(&doc).unwrap().into_single().unwrap();
/// assert_eq!(
///     person.to_value(),
///     json!({"id": 41, "firstName": "Lindsey", "email": {"id": 33, "location": "Home"}})
/// );
/// ```
pub fn unserialize(document: &Document) -> Result<Unserialized, JsonApiError> {
    unserialize_with(document, IncludePolicy::default())
}

/// Unserializes with an explicit policy for references missing from `included`.
pub fn unserialize_with(
    document: &Document,
    policy: IncludePolicy,
) -> Result<Unserialized, JsonApiError> {
    if document.has_errors() {
        warn!(count = document.errors.len(), "Document carries errors");
        return Err(JsonApiError::from_error_objects(document.errors.clone()));
    }

    let resolver = Resolver::new(&document.included, policy);

    match &document.data {
        None => Ok(Unserialized::Empty),
        Some(PrimaryData::One(resource)) => resolver.record(resource).map(Unserialized::Single),
        Some(PrimaryData::Many(resources)) => {
            let records = resources
                .iter()
                .map(|resource| resolver.record(resource))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(
                records = records.len(),
                included = document.included.len(),
                "Unserialized page"
            );
            let links = document.links.clone().unwrap_or_default();
            Ok(Unserialized::Many(Page::new(records, links)))
        }
    }
}

/// Lookup table over `included`, keyed on `(type, id)`.
struct Resolver<'a> {
    included: HashMap<(&'a str, &'a ResourceId), &'a ResourceObject>,
    policy: IncludePolicy,
}

impl<'a> Resolver<'a> {
    fn new(included: &'a [ResourceObject], policy: IncludePolicy) -> Self {
        let mut table = HashMap::with_capacity(included.len());
        for resource in included {
            if let Some(id) = &resource.id {
                // First occurrence wins when a server repeats an entry.
                table
                    .entry((resource.resource_type.as_str(), id))
                    .or_insert(resource);
            }
        }
        Self {
            included: table,
            policy,
        }
    }

    fn record(&self, resource: &'a ResourceObject) -> Result<Record, JsonApiError> {
        let mut relations = Vec::new();
        if let Some(relationships) = &resource.relationships {
            for (field, relationship) in relationships {
                if let Some(data) = &relationship.data {
                    relations.push((field.clone(), self.relation(field, data)?));
                }
            }
        }

        Ok(RecordBuilder::new()
            .id(resource.id.clone())
            .attributes(resource.attributes.clone().unwrap_or_default())
            .relations(relations)
            .build())
    }

    fn relation(
        &self,
        field: &str,
        data: &'a RelationshipData,
    ) -> Result<Relation, JsonApiError> {
        match data {
            RelationshipData::Null => Ok(Relation::Null),
            RelationshipData::One(identifier) => self
                .related(field, identifier)
                .map(|record| Relation::One(Box::new(record))),
            RelationshipData::Many(identifiers) => identifiers
                .iter()
                .map(|identifier| self.related(field, identifier))
                .collect::<Result<Vec<_>, _>>()
                .map(Relation::Many),
        }
    }

    fn related(
        &self,
        field: &str,
        identifier: &'a ResourceIdentifier,
    ) -> Result<Record, JsonApiError> {
        let key = (identifier.resource_type.as_str(), &identifier.id);
        match self.included.get(&key) {
            Some(resource) => Ok(RecordBuilder::new()
                .id(Some(identifier.id.clone()))
                .attributes(resource.attributes.clone().unwrap_or_default())
                .build()),
            None => match self.policy {
                IncludePolicy::Stub => Ok(Record::stub(identifier.id.clone())),
                IncludePolicy::Strict => Err(JsonApiError::RelationNotIncluded {
                    field: field.to_string(),
                    resource_type: identifier.resource_type.clone(),
                    id: identifier.id.clone(),
                }),
            },
        }
    }
}
