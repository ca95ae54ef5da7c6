//! # profview - Incremental Profile Symbolication and Call Tree Analysis
//!
//! profview ingests a raw execution profile (sampled call stacks referencing
//! addresses inside native libraries) and produces a human-inspectable,
//! hierarchical view of where time was spent.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Raw Profile (JSON)                         │
//! │        threads × { sample stacks, frame tables }                │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ addresses inside native libraries
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    profview (This Crate)                        │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐        │
//! │  │ Coordinator  │──▶│ Symbol Store │──▶│  Host (ELF,  │        │
//! │  │ (per-library │   │ (dedup +     │   │  disk cache) │        │
//! │  │  patching)   │   │  durable)    │   └──────────────┘        │
//! │  └──────┬───────┘   └──────────────┘                           │
//! │         │ incremental snapshots                                │
//! │         ▼                                                      │
//! │  ┌──────────────┐   ┌──────────────┐                           │
//! │  │   Analysis   │   │    Status    │                           │
//! │  │ (call tree)  │   │  (reducer)   │                           │
//! │  └──────────────┘   └──────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`profile`]: immutable profile snapshots with copy-on-write patching
//! - [`symbolication`]: symbol tables, the deduplicating [`symbolication::SymbolStore`],
//!   and the per-library [`symbolication::symbolicate`] coordinator
//! - [`host`]: concrete host boundary (ELF symbol extraction, on-disk cache,
//!   fetch event reporting)
//! - [`analysis`]: call tree aggregation with total/self accounting
//! - [`status`]: pure reducer tracking the pipeline phase and in-flight fetches
//! - [`cli`], [`domain`]: argument parsing and core newtypes/errors
//!
//! ## Key Concepts
//!
//! - **Library key**: (debug name, build id) pair identifying a native
//!   library; the unit of caching and deduplication
//! - **Single-flight**: concurrent resolutions for one key share one fetch
//! - **Total / self count**: samples passing through a call tree node vs
//!   samples where it was the executing leaf

pub mod analysis;
pub mod cli;
pub mod domain;
pub mod host;
pub mod profile;
pub mod status;
pub mod symbolication;
