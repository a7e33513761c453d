use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

new_key_type! {
    /// Opaque handle for a node stored in the canvas arena.
    pub struct NodeId;
}

/// Source of persisted node identities. Atomic only so that the counter can
/// live in a static; the engine itself is single-threaded.
static NEXT_INTERNAL_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate the next internal node id.
pub(crate) fn next_internal_id() -> u64 {
    NEXT_INTERNAL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Make sure future ids are greater than `seen`. Used when loading documents
/// that carry explicit ids.
pub(crate) fn reserve_internal_id(seen: u64) {
    NEXT_INTERNAL_ID.fetch_max(seen.saturating_add(1), Ordering::Relaxed);
}
