use crate::collection::{Collection, CollectionUrls};
use crate::config::ClientConfig;
use jsonapi_core::{ResourceSchema, Transport};
use std::sync::Arc;

/// Entry point that hands out [`Collection`]s sharing one transport and one
/// [`ClientConfig`].
pub struct Client<T> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T: Transport + 'static> Client<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A collection at `{type}`, relative to the transport's base URL.
    pub fn collection(&self, schema: ResourceSchema) -> Collection<T> {
        self.configure(Collection::new(self.transport.clone(), schema))
    }

    /// A collection with custom URL templates.
    pub fn collection_at(&self, schema: ResourceSchema, urls: CollectionUrls) -> Collection<T> {
        self.configure(Collection::with_urls(self.transport.clone(), schema, urls))
    }

    fn configure(&self, collection: Collection<T>) -> Collection<T> {
        collection
            .include_policy(self.config.include_policy)
            .page_size(self.config.page_size)
    }
}

#[cfg(feature = "http")]
impl Client<crate::http::HttpTransport> {
    /// A client over HTTP, built from `config`.
    pub fn connect(config: ClientConfig) -> Result<Self, jsonapi_core::JsonApiError> {
        let transport = crate::http::HttpTransport::from_config(&config)?;
        Ok(Self::new(transport, config))
    }
}
