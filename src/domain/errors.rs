//! Structured error types for profview
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! `FetchError` is `Clone` because the symbol store broadcasts one outcome to
//! every caller attached to the same in-flight resolution.

use super::types::LibraryKey;
use thiserror::Error;

/// A library's symbol table could not be obtained from the host.
///
/// Contained per library: one failed library never aborts the run, its frames
/// are simply left unresolved.
#[derive(Error, Debug, Clone)]
#[error("Failed to fetch symbol table for {library}: {reason}")]
pub struct FetchError {
    pub library: LibraryKey,
    pub reason: String,
}

impl FetchError {
    pub fn new(library: LibraryKey, reason: impl Into<String>) -> Self {
        Self { library, reason: reason.into() }
    }
}

/// Durable symbol cache read/write failure.
///
/// Never fatal: a failed read is treated as a cache miss (forcing a live
/// fetch) and a failed write is logged and ignored.
#[derive(Error, Debug)]
pub enum DurableStoreError {
    #[error("Failed to read cached symbol table: {0}")]
    ReadFailed(String),

    #[error("Failed to write cached symbol table: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Raw profile input could not be loaded.
#[derive(Error, Debug)]
pub enum ProfileLoadError {
    #[error("Invalid profile data: {0}")]
    InvalidData(String),

    #[error("Thread index {index} out of range ({count} threads in profile)")]
    ThreadOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
