//! ELF symbol table extraction
//!
//! Serves symbol tables straight from library files on disk: parse the ELF,
//! check its build id against the requested key, collect the defined function
//! symbols, and demangle their names. Only symbol names are extracted; no
//! DWARF parsing is involved, so this works on stripped-to-symtab binaries.

use crate::domain::{FetchError, LibraryKey};
use crate::symbolication::store::SymbolSupplier;
use crate::symbolication::{SymbolEntry, SymbolTable};
use object::{Object, ObjectSymbol, SymbolKind};
use rustc_demangle::demangle;
use std::path::PathBuf;

/// Symbol supplier backed by a directory of ELF libraries, looked up by
/// debug name.
pub struct ElfSymbolSupplier {
    symbol_dir: PathBuf,
}

impl ElfSymbolSupplier {
    pub fn new(symbol_dir: impl Into<PathBuf>) -> Self {
        Self { symbol_dir: symbol_dir.into() }
    }

    fn load(&self, key: &LibraryKey) -> Result<SymbolTable, FetchError> {
        let path = self.symbol_dir.join(&key.debug_name);
        let data = std::fs::read(&path)
            .map_err(|e| FetchError::new(key.clone(), format!("{}: {e}", path.display())))?;

        let obj = object::File::parse(&*data)
            .map_err(|e| FetchError::new(key.clone(), format!("not a valid object file: {e}")))?;

        // Refuse a library whose build id does not match the key: a rebuilt
        // binary has different symbol offsets and would resolve garbage.
        if let Ok(Some(build_id)) = obj.build_id() {
            let hex: String = build_id.iter().map(|b| format!("{b:02x}")).collect();
            if hex != key.build_id {
                return Err(FetchError::new(
                    key.clone(),
                    format!("build id mismatch: file has {hex}"),
                ));
            }
        }

        let entries: Vec<SymbolEntry> = obj
            .symbols()
            .filter(|sym| sym.is_definition() && sym.kind() == SymbolKind::Text)
            .filter_map(|sym| {
                let name = sym.name().ok()?;
                Some(SymbolEntry {
                    offset: sym.address(),
                    name: format!("{:#}", demangle(name)),
                })
            })
            .collect();

        if entries.is_empty() {
            return Err(FetchError::new(key.clone(), "no function symbols in file"));
        }

        Ok(SymbolTable::new(entries))
    }
}

impl SymbolSupplier for ElfSymbolSupplier {
    async fn fetch(&self, key: &LibraryKey) -> Result<SymbolTable, FetchError> {
        // Parsing is CPU-bound but small; run it inline on the control
        // thread like the rest of the pipeline.
        self.load(key)
    }
}
