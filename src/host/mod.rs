//! Host-boundary implementations
//!
//! The symbolication pipeline only knows the [`SymbolSupplier`] and
//! [`DurableStore`] contracts; this module provides the concrete host pieces
//! wired up by the binary:
//!
//! - [`ElfSymbolSupplier`]: extracts a symbol table from an ELF library on
//!   disk, verifying the build id against the requested key.
//! - [`JsonDirStore`]: durable symbol table cache, one JSON file per library
//!   key under a cache directory.
//! - [`EventedSupplier`]: wraps any supplier and reports fetch start/finish
//!   on the pipeline event channel.

pub mod elf;
pub mod events;
pub mod json_store;

pub use elf::ElfSymbolSupplier;
pub use events::EventedSupplier;
pub use json_store::JsonDirStore;
