//! # Paged Collection Iterator
//!
//! A [`Pager`] walks a multi-page listing by following the `links.next` pointer of each
//! page, and hands the records out one at a time. Callers pull with [`Pager::next`] or
//! turn the pager into a `futures::Stream` with [`Pager::into_stream`].
//!
//! ## State machine
//!
//! ```text
//! Idle ──► Fetching ──► Emitting ──► (Fetching | Done)
//!              │
//!              └──► Failed
//! ```
//!
//! - A page whose data is empty (or `null`) ends the walk without emitting anything.
//! - A page's records are all emitted before the next page is requested; the request is
//!   only made when the consumer pulls past the last buffered record.
//! - A fetch or unserialize failure is yielded once, then the pager stays `Failed`.
//! - `Done` and `Failed` are terminal. Walking again means building a new pager.
//!
//! ## Cancellation
//!
//! Dropping the pager (or the stream) cancels it. A [`CancelHandle`] cancels from
//! elsewhere: an in-flight fetch future is dropped at once and the pager settles to
//! `Done` without emitting further records.
//!
//! A pager has exactly one consumer; it is driven through `&mut self`, so the borrow
//! checker rules out concurrent pulls on the same instance.

use crate::document::{Document, Link};
use crate::error::JsonApiError;
use crate::record::Record;
use crate::unserialize::{unserialize_with, IncludePolicy};
use async_trait::async_trait;
use futures::Stream;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Fetches one page of a listing.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<Document, JsonApiError>;
}

#[async_trait]
impl<P: PageFetcher + ?Sized> PageFetcher for Arc<P> {
    async fn fetch_page(&self, url: &str) -> Result<Document, JsonApiError> {
        (**self).fetch_page(url).await
    }
}

/// Adapts an async closure `(url) -> Result<Document>` into a [`PageFetcher`].
pub struct FnFetcher<F> {
    fetch: F,
}

impl<F> FnFetcher<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<F, Fut> PageFetcher for FnFetcher<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Document, JsonApiError>> + Send,
{
    async fn fetch_page(&self, url: &str) -> Result<Document, JsonApiError> {
        (self.fetch)(url.to_string()).await
    }
}

/// Observable state of a [`Pager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing fetched yet.
    Idle,
    /// A page request is in flight.
    Fetching,
    /// Records of the current page are being handed out.
    Emitting,
    /// No more records. Terminal.
    Done,
    /// A fetch or unserialize step failed. Terminal.
    Failed,
}

/// Cancels a [`Pager`] from outside its consumer.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Lazy, forward-only walk over every record of a multi-page listing.
pub struct Pager<F> {
    fetcher: F,
    policy: IncludePolicy,
    /// URL of the page to request next; `None` once the last page was seen.
    current_url: Option<String>,
    buffer: VecDeque<Record>,
    state: PagerState,
    pages_fetched: usize,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
}

impl<F: PageFetcher> Pager<F> {
    /// Creates a pager positioned before the first page.
    pub fn new(fetcher: F, first_url: impl Into<String>) -> Self {
        Self::with_policy(fetcher, first_url, IncludePolicy::default())
    }

    pub fn with_policy(fetcher: F, first_url: impl Into<String>, policy: IncludePolicy) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            fetcher,
            policy,
            current_url: Some(first_url.into()),
            buffer: VecDeque::new(),
            state: PagerState::Idle,
            pages_fetched: 0,
            cancel_tx: Arc::new(cancel_tx),
            cancel_rx,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The URL the next fetch will use, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            sender: self.cancel_tx.clone(),
        }
    }

    /// Stops the walk. Buffered records are discarded.
    pub fn cancel(&mut self) {
        self.cancel_tx.send_replace(true);
        self.finish();
    }

    /// Pulls the next record, fetching the next page when the current one is used up.
    ///
    /// Returns `None` once the pager is `Done` or `Failed`.
    pub async fn next(&mut self) -> Option<Result<Record, JsonApiError>> {
        loop {
            if *self.cancel_rx.borrow() {
                if !self.is_terminal() {
                    info!(pages = self.pages_fetched, "Pager cancelled");
                    self.finish();
                }
                return None;
            }

            if let Some(record) = self.buffer.pop_front() {
                if self.buffer.is_empty() && self.current_url.is_none() {
                    self.finish();
                }
                return Some(Ok(record));
            }

            if self.is_terminal() {
                return None;
            }

            let Some(url) = self.current_url.take() else {
                self.finish();
                return None;
            };

            self.state = PagerState::Fetching;
            debug!(%url, page = self.pages_fetched + 1, "Fetching page");

            let fetched = tokio::select! {
                biased;
                _ = wait_cancelled(&mut self.cancel_rx) => None,
                result = self.fetcher.fetch_page(&url) => Some(result),
            };

            let document = match fetched {
                None => {
                    info!(%url, "Pager cancelled during fetch");
                    self.finish();
                    return None;
                }
                Some(Err(e)) => return Some(Err(self.fail(&url, e))),
                Some(Ok(document)) => document,
            };

            let next = document
                .links
                .as_ref()
                .and_then(|links| links.next.as_ref())
                .map(Link::href)
                .map(str::to_string);

            let records = match unserialize_with(&document, self.policy) {
                Ok(unserialized) => unserialized.into_records(),
                Err(e) => return Some(Err(self.fail(&url, e))),
            };

            self.pages_fetched += 1;
            info!(
                %url,
                records = records.len(),
                has_next = next.is_some(),
                "Page received"
            );

            if records.is_empty() {
                self.finish();
                return None;
            }

            self.buffer.extend(records);
            self.current_url = next;
            self.state = PagerState::Emitting;
        }
    }

    /// Drains the whole listing, stopping at the first error.
    pub async fn try_collect(mut self) -> Result<Vec<Record>, JsonApiError> {
        let mut records = Vec::new();
        while let Some(item) = self.next().await {
            records.push(item?);
        }
        Ok(records)
    }

    /// Turns the pager into a `Stream` of records.
    pub fn into_stream(self) -> impl Stream<Item = Result<Record, JsonApiError>> + Send
    where
        F: 'static,
    {
        futures::stream::unfold(self, |mut pager| async move {
            pager.next().await.map(|item| (item, pager))
        })
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, PagerState::Done | PagerState::Failed)
    }

    fn finish(&mut self) {
        self.buffer.clear();
        self.current_url = None;
        if self.state != PagerState::Failed {
            self.state = PagerState::Done;
        }
    }

    fn fail(&mut self, url: &str, error: JsonApiError) -> JsonApiError {
        warn!(%url, error = %error, "Page fetch failed");
        self.buffer.clear();
        self.current_url = None;
        self.state = PagerState::Failed;
        error
    }
}

async fn wait_cancelled(receiver: &mut watch::Receiver<bool>) {
    loop {
        if *receiver.borrow_and_update() {
            return;
        }
        if receiver.changed().await.is_err() {
            // Every handle is gone, so nothing can cancel any more.
            futures::future::pending::<()>().await;
        }
    }
}
