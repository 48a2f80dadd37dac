use crate::collection::Collection;
use crate::query::Query;
use async_trait::async_trait;
use jsonapi_core::{JsonApiError, Record, ResourceId, Transport, Unserialized};
use serde::de::DeserializeOwned;

/// Trait for resource-specific clients to inherit the standard read and delete
/// operations of a [`Collection`], typed to the client's model.
///
/// Implementors supply the collection and an error mapping; `get`, `list` and `delete`
/// come for free. Writes usually need model-specific payloads and stay on the client.
#[async_trait]
pub trait TypedCollection<R>: Send + Sync
where
    R: DeserializeOwned + Send + 'static,
{
    type Transport: Transport + 'static;

    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner untyped collection.
    fn inner(&self) -> &Collection<Self::Transport>;

    /// Map core errors to the specific resource error type.
    fn map_error(e: JsonApiError) -> Self::Error;

    /// Fetch a resource by ID. A `404` is `Ok(None)`.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: ResourceId) -> Result<Option<R>, Self::Error> {
        tracing::debug!("Sending request");
        let result = match self.inner().one(id, &Query::new()).await {
            Ok(Unserialized::Single(record)) => into_model(&record).map(Some),
            Ok(Unserialized::Empty) | Err(JsonApiError::NotFound(_)) => Ok(None),
            Ok(Unserialized::Many(_)) => Err(JsonApiError::Validation(
                "Expected a single resource, got a collection".to_string(),
            )),
            Err(e) => Err(e),
        };
        result.map_err(Self::map_error)
    }

    /// Fetch every resource, following pagination links.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<R>, Self::Error> {
        tracing::debug!("Sending request");
        let records = self
            .inner()
            .all(&Query::new())
            .try_collect()
            .await
            .map_err(Self::map_error)?;
        records
            .iter()
            .map(|record| into_model(record).map_err(Self::map_error))
            .collect()
    }

    /// Delete a resource by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: ResourceId) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}

/// Converts an unserialized record into a model.
pub fn into_model<R: DeserializeOwned>(record: &Record) -> Result<R, JsonApiError> {
    record.deserialize()
}
