//! Symbolication run coordinator
//!
//! Drives one symbolication run over a profile snapshot: one resolution per
//! distinct referenced library, all outstanding at once, completions handled
//! in whatever order they arrive. Each successful completion patches every
//! frame of that library across all threads and emits a fresh copy-on-write
//! snapshot, so the consumer sees partial results without waiting for the
//! slowest library.

use super::store::{DurableStore, SymbolStore, SymbolSupplier};
use crate::profile::Profile;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{info, warn};
use std::sync::Arc;

/// Symbolicate `profile` against `store`, invoking `on_update` with a new
/// snapshot after each library's frames are patched.
///
/// The run completes once every distinct library has either resolved or
/// failed; a failed library leaves its frames unresolved and affects nothing
/// else. Returns the final snapshot.
pub async fn symbolicate<S, D, F>(
    profile: Arc<Profile>,
    store: &SymbolStore<S, D>,
    mut on_update: F,
) -> Arc<Profile>
where
    S: SymbolSupplier,
    D: DurableStore,
    F: FnMut(Arc<Profile>),
{
    let libs = profile.referenced_libraries();
    info!("Symbolicating {} distinct libraries", libs.len());

    // All resolutions are logically outstanding at once; the store's
    // single-flight map deduplicates any overlap in keys.
    let mut resolutions: FuturesUnordered<_> = libs
        .into_iter()
        .map(|lib| {
            let key = profile.libs[lib].clone();
            async move { (lib, store.resolve(&key).await) }
        })
        .collect();

    let mut current = profile;
    while let Some((lib, outcome)) = resolutions.next().await {
        match outcome {
            Ok(table) => {
                // Patch and emit atomically per library: the snapshot handed
                // out has every frame of this library resolved.
                current = Arc::new(current.with_library_symbols(lib, &table));
                on_update(Arc::clone(&current));
            }
            Err(e) => {
                warn!("Leaving frames of {} unresolved: {e}", current.libs[lib]);
            }
        }
    }

    info!("Symbolication finished");
    current
}
