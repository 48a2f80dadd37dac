//! # Collections
//!
//! A [`Collection`] is one resource kind served by the API (`books`, `authors`, ...).
//! It knows the kind's [`ResourceSchema`], the URL of each operation, and the
//! [`Transport`] to send requests through. Every operation:
//!
//! 1. builds the URL from the collection's templates and the [`Query`]
//! 2. serializes the body, if any, before any I/O happens
//! 3. sends the request and checks the response: a `404` is [`JsonApiError::NotFound`],
//!    a body that is not JSON is [`JsonApiError::ContentType`]
//! 4. unserializes the document with the collection's [`IncludePolicy`]
//!
//! Collections are cheap to clone; clones share the transport.

use crate::query::{Query, QueryBuilder};
use async_trait::async_trait;
use jsonapi_core::{
    serialize_map, unserialize_with, Document, IncludePolicy, JsonApiError, Method, PageFetcher,
    Pager, Request, ResourceId, ResourceSchema, Response, Transport, Unserialized,
};
use serde::Serialize;
use serde_json::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const ID_PLACEHOLDER: &str = "{id}";

/// Characters escaped when an id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL templates of the five collection operations. `{id}` is replaced by the
/// percent-encoded resource identifier.
///
/// Templates are resolved against the transport's base URL the way links are:
/// `books/{id}` lands under the base path, `/books/{id}` at the host root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionUrls {
    pub one: String,
    pub all: String,
    pub create: String,
    pub update: String,
    pub delete: String,
}

impl CollectionUrls {
    /// Conventional layout under `base`: `{base}` for listing and creation,
    /// `{base}/{id}` for the rest.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        let member = format!("{base}/{ID_PLACEHOLDER}");
        Self {
            one: member.clone(),
            all: base.clone(),
            create: base,
            update: member.clone(),
            delete: member,
        }
    }

    fn expand(template: &str, id: Option<&ResourceId>) -> String {
        match id {
            Some(id) => {
                let segment = utf8_percent_encode(&id.to_string(), PATH_SEGMENT).to_string();
                template.replace(ID_PLACEHOLDER, &segment)
            }
            None => template.to_string(),
        }
    }
}

/// Client for one resource kind.
pub struct Collection<T> {
    transport: Arc<T>,
    schema: Arc<ResourceSchema>,
    urls: CollectionUrls,
    policy: IncludePolicy,
    page_size: Option<u32>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            schema: self.schema.clone(),
            urls: self.urls.clone(),
            policy: self.policy,
            page_size: self.page_size,
        }
    }
}

impl<T: Transport + 'static> Collection<T> {
    /// A collection at the conventional URLs under `{type}`.
    pub fn new(transport: Arc<T>, schema: ResourceSchema) -> Self {
        let urls = CollectionUrls::new(schema.resource_type());
        Self::with_urls(transport, schema, urls)
    }

    pub fn with_urls(transport: Arc<T>, schema: ResourceSchema, urls: CollectionUrls) -> Self {
        Self {
            transport,
            schema: Arc::new(schema),
            urls,
            policy: IncludePolicy::default(),
            page_size: None,
        }
    }

    pub fn include_policy(mut self, policy: IncludePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Page size requested by [`many`](Self::many) and [`all`](Self::all) when the
    /// query does not set `page[size]` itself.
    pub fn page_size(mut self, size: Option<u32>) -> Self {
        self.page_size = size;
        self
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    pub fn urls(&self) -> &CollectionUrls {
        &self.urls
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Starts a query against this collection.
    pub fn query(&self) -> QueryBuilder<'_, T> {
        QueryBuilder::new(self)
    }

    /// Fetches a single resource.
    #[instrument(skip_all, fields(resource = %self.schema.resource_type()))]
    pub async fn one(
        &self,
        id: impl Into<ResourceId>,
        query: &Query,
    ) -> Result<Unserialized, JsonApiError> {
        let id = id.into();
        if matches!(&id, ResourceId::String(s) if s.is_empty()) {
            return Err(JsonApiError::Validation(
                "A JSON:API resource ID is required".to_string(),
            ));
        }
        let url = query.apply_to(&CollectionUrls::expand(&self.urls.one, Some(&id)));
        let document = self.fetch(&url).await?;
        unserialize_with(&document, self.policy)
    }

    /// Fetches one page of resources.
    #[instrument(skip_all, fields(resource = %self.schema.resource_type()))]
    pub async fn many(&self, query: &Query) -> Result<Unserialized, JsonApiError> {
        let url = self.listing_url(query);
        let document = self.fetch(&url).await?;
        let result = unserialize_with(&document, self.policy)?;
        if let Unserialized::Many(page) = &result {
            info!(records = page.len(), has_next = page.next().is_some(), "Page fetched");
        }
        Ok(result)
    }

    /// Walks every page of the listing. Nothing is fetched until the pager is pulled.
    pub fn all(&self, query: &Query) -> Pager<Collection<T>> {
        let url = self.listing_url(query);
        debug!(%url, "Creating pager");
        Pager::with_policy(self.clone(), url, self.policy)
    }

    /// Creates a resource; the server's representation is returned.
    #[instrument(skip_all, fields(resource = %self.schema.resource_type()))]
    pub async fn create<R: Serialize + ?Sized>(
        &self,
        resource: &R,
    ) -> Result<Unserialized, JsonApiError> {
        let (object, id) = self.to_object(resource)?;
        let body = serialize_map(&self.schema, &object)?;
        let url = CollectionUrls::expand(&self.urls.create, id.as_ref());
        self.send_document(Method::Post, url, body).await
    }

    /// Updates a resource, which must carry an `id`.
    #[instrument(skip_all, fields(resource = %self.schema.resource_type()))]
    pub async fn update<R: Serialize + ?Sized>(
        &self,
        resource: &R,
    ) -> Result<Unserialized, JsonApiError> {
        let (object, id) = self.to_object(resource)?;
        let Some(id) = id else {
            return Err(JsonApiError::Validation(
                "A JSON:API resource ID is required to update a resource".to_string(),
            ));
        };
        let body = serialize_map(&self.schema, &object)?;
        let url = CollectionUrls::expand(&self.urls.update, Some(&id));
        self.send_document(Method::Patch, url, body).await
    }

    /// Deletes a resource. Only `200`, `202` and `204` count as success.
    #[instrument(skip_all, fields(resource = %self.schema.resource_type()))]
    pub async fn delete(&self, id: impl Into<ResourceId>) -> Result<(), JsonApiError> {
        let id = id.into();
        let url = CollectionUrls::expand(&self.urls.delete, Some(&id));
        let response = self
            .transport
            .perform(Request::new(Method::Delete, url.clone()))
            .await?;

        if response.status == 404 {
            return Err(JsonApiError::NotFound(url));
        }
        if !matches!(response.status, 200 | 202 | 204) {
            warn!(%url, status = response.status, "Delete rejected");
            return Err(JsonApiError::UnexpectedStatus {
                status: response.status,
                url,
            });
        }

        info!(%url, %id, "Resource deleted");
        Ok(())
    }

    fn listing_url(&self, query: &Query) -> String {
        match self.page_size {
            Some(size) if !query.has_page("size") => {
                query.clone().page("size", size).apply_to(&self.urls.all)
            }
            _ => query.apply_to(&self.urls.all),
        }
    }

    fn to_object<R: Serialize + ?Sized>(
        &self,
        resource: &R,
    ) -> Result<(serde_json::Map<String, Value>, Option<ResourceId>), JsonApiError> {
        match serde_json::to_value(resource)? {
            Value::Object(object) => {
                let id = object.get("id").and_then(ResourceId::from_value);
                Ok((object, id))
            }
            _ => Err(JsonApiError::Validation(format!(
                "A `{}` resource must serialize to a JSON object",
                self.schema.resource_type()
            ))),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Document, JsonApiError> {
        debug!(%url, "GET");
        let response = self.transport.perform(Request::get(url)).await?;
        check_document(url, &response)
    }

    async fn send_document(
        &self,
        method: Method,
        url: String,
        body: Document,
    ) -> Result<Unserialized, JsonApiError> {
        debug!(%method, %url, "Sending document");
        let response = self
            .transport
            .perform(Request::new(method, url.clone()).body(body))
            .await?;

        // A server may accept a write without echoing the resource back.
        if response.status == 204 {
            info!(%method, %url, "Accepted without content");
            return Ok(Unserialized::Empty);
        }

        let document = check_document(&url, &response)?;
        let result = unserialize_with(&document, self.policy)?;
        info!(%method, %url, status = response.status, "Document sent");
        Ok(result)
    }
}

/// Not-found first, then content type, then the body itself.
fn check_document(url: &str, response: &Response) -> Result<Document, JsonApiError> {
    if response.status == 404 {
        return Err(JsonApiError::NotFound(url.to_string()));
    }
    if !response.is_json() {
        warn!(%url, status = response.status, content_type = ?response.content_type(), "Not a JSON response");
        return Err(JsonApiError::ContentType(
            response.content_type().map(str::to_string),
        ));
    }

    let document = response.document()?;
    if !response.is_success() && !document.has_errors() {
        return Err(JsonApiError::UnexpectedStatus {
            status: response.status,
            url: url.to_string(),
        });
    }
    Ok(document)
}

#[async_trait]
impl<T: Transport + 'static> PageFetcher for Collection<T> {
    async fn fetch_page(&self, url: &str) -> Result<Document, JsonApiError> {
        self.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_core::mock::MockTransport;
    use serde_json::json;

    fn books(mock: &MockTransport) -> Collection<MockTransport> {
        Collection::new(
            Arc::new(mock.clone()),
            ResourceSchema::new("books").relationship("author", "authors"),
        )
    }

    #[test]
    fn default_urls_hang_off_the_base() {
        let urls = CollectionUrls::new("books/");
        assert_eq!(urls.all, "books");
        assert_eq!(urls.create, "books");
        assert_eq!(urls.one, "books/{id}");
        assert_eq!(
            CollectionUrls::expand(&urls.delete, Some(&ResourceId::from(7u64))),
            "books/7"
        );
    }

    #[test]
    fn ids_are_escaped_as_one_path_segment() {
        let urls = CollectionUrls::new("books");
        let id = ResourceId::from("a/b?c#d e");
        assert_eq!(
            CollectionUrls::expand(&urls.one, Some(&id)),
            "books/a%2Fb%3Fc%23d%20e"
        );
    }

    #[tokio::test]
    async fn reserved_characters_in_ids_stay_in_the_path() {
        let mock = MockTransport::new();
        mock.expect_get("books/978%2F0441?include=author")
            .return_document(json!({"data": {"type": "books", "id": "978/0441"}}));
        mock.expect_delete("books/50%25").return_status(204);

        let books = books(&mock);
        books
            .one("978/0441", &Query::new().include("author"))
            .await
            .unwrap();
        books.delete("50%").await.unwrap();
        mock.verify();
    }

    #[tokio::test]
    async fn one_rejects_an_empty_id_before_any_request() {
        let mock = MockTransport::new();
        let err = books(&mock).one("", &Query::new()).await.unwrap_err();
        assert!(matches!(err, JsonApiError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn not_found_is_checked_before_content_type() {
        let mock = MockTransport::new();
        mock.expect_get("books/1").return_response(
            Response::new(404)
                .header("content-type", "text/html")
                .with_body("<h1>Not Found</h1>"),
        );
        let err = books(&mock).one("1", &Query::new()).await.unwrap_err();
        assert!(matches!(err, JsonApiError::NotFound(url) if url == "books/1"));
        mock.verify();
    }

    #[tokio::test]
    async fn html_error_page_is_a_content_type_error() {
        let mock = MockTransport::new();
        mock.expect_get("books").return_response(
            Response::new(500)
                .header("content-type", "text/html")
                .with_body("<h1>Oops</h1>"),
        );
        let err = books(&mock).many(&Query::new()).await.unwrap_err();
        match err {
            JsonApiError::ContentType(ct) => assert_eq!(ct.as_deref(), Some("text/html")),
            other => panic!("Expected content type error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_documents_surface_their_detail() {
        let mock = MockTransport::new();
        mock.expect_get("books").return_json(
            422,
            json!({"errors": [{"status": "422", "detail": "Invalid filter"}]}),
        );
        let err = books(&mock).many(&Query::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid filter");
    }

    #[tokio::test]
    async fn failure_status_without_errors_is_unexpected() {
        let mock = MockTransport::new();
        mock.expect_get("books").return_json(500, json!({}));
        let err = books(&mock).many(&Query::new()).await.unwrap_err();
        assert!(matches!(err, JsonApiError::UnexpectedStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn update_requires_an_id() {
        let mock = MockTransport::new();
        let err = books(&mock)
            .update(&json!({"title": "Untitled"}))
            .await
            .unwrap_err();
        assert!(matches!(err, JsonApiError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn related_object_without_id_fails_before_sending() {
        let mock = MockTransport::new();
        let err = books(&mock)
            .create(&json!({"title": "Dune", "author": {"name": "Frank"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, JsonApiError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn delete_accepts_only_success_codes() {
        let mock = MockTransport::new();
        mock.expect_delete("books/1").return_status(204);
        mock.expect_delete("books/2").return_status(202);
        mock.expect_delete("books/3").return_status(201);
        mock.expect_delete("books/4").return_status(404);

        let books = books(&mock);
        books.delete("1").await.unwrap();
        books.delete("2").await.unwrap();
        assert!(matches!(
            books.delete("3").await,
            Err(JsonApiError::UnexpectedStatus { status: 201, .. })
        ));
        assert!(matches!(books.delete("4").await, Err(JsonApiError::NotFound(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn page_size_is_added_unless_the_query_sets_one() {
        let mock = MockTransport::new();
        mock.expect_get("books?page%5Bsize%5D=25")
            .return_document(json!({"data": []}));
        mock.expect_get("books?page%5Bsize%5D=5")
            .return_document(json!({"data": []}));

        let books = books(&mock).page_size(Some(25));
        books.many(&Query::new()).await.unwrap();
        books.many(&Query::new().page("size", 5)).await.unwrap();
        mock.verify();
    }
}
