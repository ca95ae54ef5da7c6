//! Profile data model
//!
//! A [`Profile`] is an ordered sequence of [`Thread`]s. Each thread carries a
//! sample list (stacks of frame ids, root to leaf) and a frame table mapping
//! frame id to `{address, owning library, resolved name}`.
//!
//! Snapshots handed to consumers are immutable. Symbolication never mutates a
//! snapshot in place: patching a library's frames produces a new `Profile`
//! whose untouched threads and sample lists are shared structurally via `Arc`,
//! so each incremental snapshot costs O(changed threads), not O(profile size).

use crate::domain::{LibraryKey, ProfileLoadError, Tid};
use crate::symbolication::SymbolTable;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Resolution state of a frame's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameName {
    /// Resolved to a function from the library's symbol table.
    Resolved(String),

    /// The library's symbol table resolved, but the frame's address precedes
    /// the lowest known symbol. This outcome is permanent for the run; the
    /// frame is never retried.
    OutsideKnownSymbols,
}

/// One entry in a thread's frame table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Address of the sampled instruction, relative to the owning library.
    pub address: u64,

    /// Index into the profile-level library list, or `None` when the address
    /// did not fall inside any known library.
    pub lib: Option<usize>,

    /// `None` until symbolication has patched this frame (or permanently, if
    /// the library's fetch failed).
    pub name: Option<FrameName>,
}

impl Frame {
    /// Function identity used when merging call paths.
    ///
    /// Unresolved frames keep one identity per distinct address, so unrelated
    /// code is never collapsed into a single bucket.
    #[must_use]
    pub fn identity(&self) -> Cow<'_, str> {
        match &self.name {
            Some(FrameName::Resolved(name)) => Cow::Borrowed(name.as_str()),
            _ => Cow::Owned(format!("0x{:x}", self.address)),
        }
    }
}

/// One sampled stack: frame ids ordered root to leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleStack(pub Vec<usize>);

/// A single profiled thread: sample list plus frame table.
#[derive(Debug, Clone)]
pub struct Thread {
    pub name: String,
    pub tid: Tid,
    pub samples: Arc<Vec<SampleStack>>,
    pub frames: Arc<Vec<Frame>>,
}

impl Thread {
    /// Whether any frame of this thread belongs to the given library.
    #[must_use]
    pub fn references_library(&self, lib: usize) -> bool {
        self.frames.iter().any(|f| f.lib == Some(lib))
    }

    /// Return a copy of this thread with every frame of `lib` resolved
    /// against `table`. The sample list is shared with the original.
    #[must_use]
    pub fn with_library_symbols(&self, lib: usize, table: &SymbolTable) -> Thread {
        let frames = self
            .frames
            .iter()
            .map(|frame| {
                if frame.lib != Some(lib) {
                    return frame.clone();
                }
                let name = match table.lookup(frame.address) {
                    Some(func) => FrameName::Resolved(func.to_string()),
                    None => FrameName::OutsideKnownSymbols,
                };
                Frame { name: Some(name), ..frame.clone() }
            })
            .collect();
        Thread {
            name: self.name.clone(),
            tid: self.tid,
            samples: Arc::clone(&self.samples),
            frames: Arc::new(frames),
        }
    }
}

/// An in-memory profile snapshot.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Libraries referenced by frame tables, indexed by `Frame::lib`.
    pub libs: Arc<Vec<LibraryKey>>,
    pub threads: Vec<Arc<Thread>>,
}

impl Profile {
    /// Distinct library indices referenced by any frame across all threads.
    ///
    /// `BTreeSet` keeps enumeration order deterministic.
    #[must_use]
    pub fn referenced_libraries(&self) -> BTreeSet<usize> {
        self.threads
            .iter()
            .flat_map(|t| t.frames.iter())
            .filter_map(|f| f.lib)
            .collect()
    }

    /// Produce a new snapshot with every frame of `lib` resolved against
    /// `table`. Threads that do not reference the library are shared with the
    /// original snapshot.
    #[must_use]
    pub fn with_library_symbols(&self, lib: usize, table: &SymbolTable) -> Profile {
        let threads = self
            .threads
            .iter()
            .map(|thread| {
                if thread.references_library(lib) {
                    Arc::new(thread.with_library_symbols(lib, table))
                } else {
                    Arc::clone(thread)
                }
            })
            .collect();
        Profile { libs: Arc::clone(&self.libs), threads }
    }

    /// Parse a raw profile JSON file into the in-memory representation.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// references libraries or frames that do not exist.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProfileLoadError> {
        let content = std::fs::read_to_string(path)?;
        let raw: RawProfile = serde_json::from_str(&content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawProfile) -> Result<Self, ProfileLoadError> {
        let libs: Vec<LibraryKey> = raw
            .libs
            .into_iter()
            .map(|l| LibraryKey::new(l.debug_name, l.build_id))
            .collect();

        let mut threads = Vec::with_capacity(raw.threads.len());
        for raw_thread in raw.threads {
            let frames: Vec<Frame> = raw_thread
                .frames
                .iter()
                .map(|f| {
                    if let Some(lib) = f.lib {
                        if lib >= libs.len() {
                            return Err(ProfileLoadError::InvalidData(format!(
                                "frame references library {lib}, profile has {}",
                                libs.len()
                            )));
                        }
                    }
                    Ok(Frame { address: f.address, lib: f.lib, name: None })
                })
                .collect::<Result<_, _>>()?;

            for stack in &raw_thread.samples {
                if let Some(&id) = stack.iter().find(|&&id| id >= frames.len()) {
                    return Err(ProfileLoadError::InvalidData(format!(
                        "sample references frame {id}, thread \"{}\" has {}",
                        raw_thread.name,
                        frames.len()
                    )));
                }
            }

            threads.push(Arc::new(Thread {
                name: raw_thread.name,
                tid: Tid(raw_thread.tid),
                samples: Arc::new(raw_thread.samples.into_iter().map(SampleStack).collect()),
                frames: Arc::new(frames),
            }));
        }

        Ok(Profile { libs: Arc::new(libs), threads })
    }
}

// Serde mirror of the on-disk raw profile format.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    libs: Vec<RawLib>,
    threads: Vec<RawThread>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLib {
    debug_name: String,
    build_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawThread {
    name: String,
    #[serde(default)]
    tid: u32,
    frames: Vec<RawFrame>,
    samples: Vec<Vec<usize>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrame {
    address: u64,
    #[serde(default)]
    lib: Option<usize>,
}
