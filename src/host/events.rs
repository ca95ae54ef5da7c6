//! Fetch event reporting
//!
//! Wraps a supplier so every underlying fetch is bracketed by
//! `LibraryFetchStarted` / `LibraryFetchFinished` events. The symbol store
//! issues at most one concurrent fetch per library, so the event stream never
//! shows a library as being fetched twice at once.

use crate::domain::{FetchError, LibraryKey};
use crate::status::PipelineEvent;
use crate::symbolication::store::SymbolSupplier;
use crate::symbolication::SymbolTable;
use tokio::sync::mpsc::UnboundedSender;

pub struct EventedSupplier<S> {
    inner: S,
    events: UnboundedSender<PipelineEvent>,
}

impl<S> EventedSupplier<S> {
    pub fn new(inner: S, events: UnboundedSender<PipelineEvent>) -> Self {
        Self { inner, events }
    }
}

impl<S: SymbolSupplier> SymbolSupplier for EventedSupplier<S> {
    async fn fetch(&self, key: &LibraryKey) -> Result<SymbolTable, FetchError> {
        // A dropped receiver just means nobody is watching; keep fetching.
        let _ = self.events.send(PipelineEvent::LibraryFetchStarted(key.clone()));
        let result = self.inner.fetch(key).await;
        let _ = self.events.send(PipelineEvent::LibraryFetchFinished(key.clone()));
        result
    }
}
