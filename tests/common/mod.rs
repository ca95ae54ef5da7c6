//! Shared test doubles for the symbolication pipeline tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use profview::domain::{DurableStoreError, FetchError, LibraryKey, Tid};
use profview::profile::{Frame, Profile, SampleStack, Thread};
use profview::symbolication::store::{DurableStore, SymbolSupplier};
use profview::symbolication::{SymbolEntry, SymbolTable};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn table(entries: &[(u64, &str)]) -> SymbolTable {
    SymbolTable::new(
        entries
            .iter()
            .map(|(offset, name)| SymbolEntry { offset: *offset, name: (*name).to_string() })
            .collect(),
    )
}

/// A scripted [`SymbolSupplier`]: per-key outcomes that the test can change
/// between calls, a per-key fetch counter, and an optional artificial delay
/// so completions can be interleaved deterministically.
#[derive(Default)]
pub struct ScriptedSupplier {
    outcomes: Mutex<HashMap<LibraryKey, Result<SymbolTable, String>>>,
    delays: Mutex<HashMap<LibraryKey, Duration>>,
    fetches: Mutex<HashMap<LibraryKey, usize>>,
    total_fetches: AtomicUsize,
}

impl ScriptedSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed_with(&self, key: &LibraryKey, table: SymbolTable) {
        self.outcomes.lock().unwrap().insert(key.clone(), Ok(table));
    }

    pub fn fail_with(&self, key: &LibraryKey, reason: &str) {
        self.outcomes.lock().unwrap().insert(key.clone(), Err(reason.to_string()));
    }

    pub fn delay(&self, key: &LibraryKey, delay: Duration) {
        self.delays.lock().unwrap().insert(key.clone(), delay);
    }

    pub fn fetch_count(&self, key: &LibraryKey) -> usize {
        self.fetches.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.total_fetches.load(Ordering::SeqCst)
    }
}

impl SymbolSupplier for ScriptedSupplier {
    async fn fetch(&self, key: &LibraryKey) -> Result<SymbolTable, FetchError> {
        *self.fetches.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
        self.total_fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            // Always suspend at the fetch boundary so overlapping callers can
            // attach to the in-flight resolution.
            tokio::task::yield_now().await;
        }

        match self.outcomes.lock().unwrap().get(key) {
            Some(Ok(table)) => Ok(table.clone()),
            Some(Err(reason)) => Err(FetchError::new(key.clone(), reason.clone())),
            None => Err(FetchError::new(key.clone(), "no such library scripted")),
        }
    }
}

/// An in-memory [`DurableStore`] with operation counters and switchable
/// failure injection.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<LibraryKey, SymbolTable>>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    fail_reads: AtomicUsize,
    fail_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preloaded(key: &LibraryKey, table: SymbolTable) -> Self {
        let store = Self::default();
        store.tables.lock().unwrap().insert(key.clone(), table);
        store
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(1, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(1, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &LibraryKey) -> bool {
        self.tables.lock().unwrap().contains_key(key)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl DurableStore for MemoryStore {
    async fn get(&self, key: &LibraryKey) -> Result<Option<SymbolTable>, DurableStoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) != 0 {
            return Err(DurableStoreError::ReadFailed("injected".to_string()));
        }
        Ok(self.tables.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &LibraryKey, table: &SymbolTable) -> Result<(), DurableStoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) != 0 {
            return Err(DurableStoreError::WriteFailed("injected".to_string()));
        }
        self.tables.lock().unwrap().insert(key.clone(), table.clone());
        Ok(())
    }
}

/// Build a profile: `libs` plus per-thread `(name, frames, samples)` where a
/// frame is `(address, lib index)`.
pub fn profile(
    libs: &[LibraryKey],
    threads: &[(&str, &[(u64, Option<usize>)], &[&[usize]])],
) -> Arc<Profile> {
    let threads = threads
        .iter()
        .enumerate()
        .map(|(i, (name, frames, samples))| {
            Arc::new(Thread {
                name: (*name).to_string(),
                tid: Tid(i as u32 + 1),
                samples: Arc::new(
                    samples.iter().map(|stack| SampleStack(stack.to_vec())).collect(),
                ),
                frames: Arc::new(
                    frames
                        .iter()
                        .map(|(address, lib)| Frame { address: *address, lib: *lib, name: None })
                        .collect(),
                ),
            })
        })
        .collect();
    Arc::new(Profile { libs: Arc::new(libs.to_vec()), threads })
}

pub fn lib(debug_name: &str, build_id: &str) -> LibraryKey {
    LibraryKey::new(debug_name, build_id)
}
