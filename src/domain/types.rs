//! Core domain newtypes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Thread ID newtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tid(pub u32);

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

/// Identity of a native library, and the key under which its symbol table is
/// cached and deduplicated.
///
/// Two libraries are equal iff both the debug name and the build identifier
/// match exactly. The same debug name with a different build id is a different
/// library (a rebuilt binary has different symbol offsets).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryKey {
    /// Debug file name of the library (e.g. `libxul.so`)
    pub debug_name: String,

    /// Build identifier distinguishing builds of the same library
    pub build_id: String,
}

impl LibraryKey {
    pub fn new(debug_name: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self { debug_name: debug_name.into(), build_id: build_id.into() }
    }
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.debug_name, self.build_id)
    }
}
