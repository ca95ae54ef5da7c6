//! Deduplicating symbol table store
//!
//! [`SymbolStore`] sits between the coordinator and the slow host fetch. It
//! layers three caches:
//!
//! 1. an in-memory map of completed tables (`Arc`-shared, process lifetime),
//! 2. a durable store checked before any fetch and written back on success,
//! 3. a single-flight map so concurrent callers for the same library key
//!    attach to one outstanding resolution and share its outcome.
//!
//! A failed fetch is never cached: the in-flight entry is removed on
//! completion either way, so the next call for that library retries from
//! scratch.

use super::table::SymbolTable;
use crate::domain::{DurableStoreError, FetchError, LibraryKey};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

/// Host-side source of raw symbol tables, one fetch per library.
///
/// The store guarantees `fetch` is invoked at most once concurrently per
/// library key, and not at all for a key with a cached successful result.
#[allow(async_fn_in_trait)]
pub trait SymbolSupplier {
    async fn fetch(&self, key: &LibraryKey) -> Result<SymbolTable, FetchError>;
}

/// Durable symbol table cache keyed by library.
///
/// Both operations may fail; the store degrades (a failed `get` counts as a
/// miss, a failed `put` is logged and ignored) rather than surfacing either.
#[allow(async_fn_in_trait)]
pub trait DurableStore {
    async fn get(&self, key: &LibraryKey) -> Result<Option<SymbolTable>, DurableStoreError>;
    async fn put(&self, key: &LibraryKey, table: &SymbolTable) -> Result<(), DurableStoreError>;
}

impl<S: SymbolSupplier> SymbolSupplier for Arc<S> {
    async fn fetch(&self, key: &LibraryKey) -> Result<SymbolTable, FetchError> {
        (**self).fetch(key).await
    }
}

impl<D: DurableStore> DurableStore for Arc<D> {
    async fn get(&self, key: &LibraryKey) -> Result<Option<SymbolTable>, DurableStoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &LibraryKey, table: &SymbolTable) -> Result<(), DurableStoreError> {
        (**self).put(key, table).await
    }
}

type ResolveOutcome = Result<Arc<SymbolTable>, FetchError>;

#[derive(Default)]
struct StoreState {
    /// Completed tables for this process lifetime.
    cached: HashMap<LibraryKey, Arc<SymbolTable>>,

    /// One entry per outstanding resolution. Joiners subscribe under the same
    /// lock the leader removes the entry under, so a subscription always
    /// precedes the leader's send.
    in_flight: HashMap<LibraryKey, broadcast::Sender<ResolveOutcome>>,
}

/// Deduplicating, persistent store of per-library symbol tables.
pub struct SymbolStore<S, D> {
    supplier: S,
    durable: D,
    state: Mutex<StoreState>,
}

impl<S: SymbolSupplier, D: DurableStore> SymbolStore<S, D> {
    pub fn new(supplier: S, durable: D) -> Self {
        Self { supplier, durable, state: Mutex::new(StoreState::default()) }
    }

    /// Resolve the symbol table for one library.
    ///
    /// Concurrent calls for the same key share one underlying fetch and
    /// receive the identical result or identical failure.
    ///
    /// # Errors
    /// Returns the contained [`FetchError`] when the host cannot produce a
    /// table for this library. The failure is not cached.
    pub async fn resolve(&self, key: &LibraryKey) -> ResolveOutcome {
        let mut rx = {
            let mut state = self.state();
            if let Some(table) = state.cached.get(key) {
                return Ok(Arc::clone(table));
            }
            match state.in_flight.get(key) {
                Some(tx) => tx.subscribe(),
                None => {
                    // Become the leader for this key.
                    let (tx, _) = broadcast::channel(1);
                    state.in_flight.insert(key.clone(), tx);
                    drop(state);
                    return self.lead(key).await;
                }
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            // The leader was dropped before publishing. Surfaced as a fetch
            // failure for this run; a later call starts a fresh resolution.
            Err(_) => Err(FetchError::new(key.clone(), "resolution abandoned")),
        }
    }

    /// Leader path: consult the durable store, fetch on miss, then publish
    /// the outcome to every attached caller.
    async fn lead(&self, key: &LibraryKey) -> ResolveOutcome {
        let cleanup = InFlightCleanup { state: &self.state, key };
        let result = self.resolve_uncached(key).await;

        let tx = {
            let mut state = self.state();
            if let Ok(table) = &result {
                state.cached.insert(key.clone(), Arc::clone(table));
            }
            state.in_flight.remove(key)
        };
        std::mem::forget(cleanup);

        if let Some(tx) = tx {
            // Send only fails when nobody attached, which is fine.
            let _ = tx.send(result.clone());
        }
        result
    }

    async fn resolve_uncached(&self, key: &LibraryKey) -> ResolveOutcome {
        match self.durable.get(key).await {
            Ok(Some(table)) => {
                debug!("Symbol table for {key} served from durable cache");
                return Ok(Arc::new(table));
            }
            Ok(None) => {}
            Err(e) => warn!("Durable symbol cache read failed for {key}: {e}"),
        }

        let table = self.supplier.fetch(key).await?;
        debug!("Fetched symbol table for {key} ({} symbols)", table.len());

        if let Err(e) = self.durable.put(key, &table).await {
            warn!("Durable symbol cache write failed for {key}: {e}");
        }
        Ok(Arc::new(table))
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // Mutation only happens at suspension-free points; a poisoned lock
        // still holds consistent data.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Removes the in-flight entry if the leader future is dropped mid-flight,
/// closing the channel so attached callers observe the abandonment instead of
/// waiting forever.
struct InFlightCleanup<'a> {
    state: &'a Mutex<StoreState>,
    key: &'a LibraryKey,
}

impl Drop for InFlightCleanup<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.in_flight.remove(self.key);
    }
}
