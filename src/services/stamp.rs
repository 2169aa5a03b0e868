use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Process-wide generation for async request tickets. Stamps are never
/// reused, so a ticket issued by a closed picker or a cancelled staging
/// can never match state opened afterwards.
pub fn next_stamp() -> u64 {
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}
