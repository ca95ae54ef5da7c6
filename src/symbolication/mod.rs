//! # Symbol Resolution Pipeline
//!
//! This module turns the raw addresses in a profile's frame tables into
//! human-readable function names. Addresses arrive as offsets inside native
//! libraries; the host can produce a symbol table for a library, but doing so
//! is slow, so the pipeline is built around three ideas:
//!
//! - **Per-library granularity**: one resolution per distinct library, not
//!   per frame. A profile with millions of samples typically references a few
//!   dozen libraries, so this bounds the number of slow operations.
//!
//! - **Deduplicating cache**: [`SymbolStore`] guarantees a single in-flight
//!   fetch per library key no matter how many callers ask concurrently, and
//!   persists successful tables to a durable store so a later run never
//!   re-fetches them.
//!
//! - **Incremental snapshots**: [`symbolicate`] patches the profile one
//!   library at a time and emits a fresh copy-on-write snapshot after each,
//!   so a consumer can render partial results without waiting for the
//!   slowest library.
//!
//! Failure containment: a failed fetch marks that library's frames
//! permanently unresolved for the run and nothing else. The worst outcome of
//! this pipeline is a profile where some frames render by raw address.

pub mod coordinator;
pub mod store;
pub mod table;

pub use coordinator::symbolicate;
pub use store::SymbolStore;
pub use table::{SymbolEntry, SymbolTable};
