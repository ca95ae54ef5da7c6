//! Per-library symbol table with floor lookup

use serde::{Deserialize, Serialize};

/// One `(offset, name)` entry of a library's symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub offset: u64,
    pub name: String,
}

/// Address-ordered symbol table for one library.
///
/// Offsets are strictly increasing, which makes name lookup a floor search:
/// the entry with the greatest offset less than or equal to the queried
/// address names the function containing that address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// Build a table from unordered entries. Entries are sorted by offset;
    /// duplicate offsets keep the first name seen.
    #[must_use]
    pub fn new(mut entries: Vec<SymbolEntry>) -> Self {
        entries.sort_by(|a, b| a.offset.cmp(&b.offset));
        entries.dedup_by(|b, a| a.offset == b.offset);
        Self { entries }
    }

    /// Name of the function containing `address`: the entry with the greatest
    /// offset ≤ `address`. `None` when the address precedes the lowest known
    /// symbol.
    #[must_use]
    pub fn lookup(&self, address: u64) -> Option<&str> {
        let idx = self.entries.partition_point(|e| e.offset <= address);
        idx.checked_sub(1).map(|i| self.entries[i].name.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }
}
