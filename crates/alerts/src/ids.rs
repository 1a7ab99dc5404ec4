//! Alert id allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use sr_core::types::AlertId;

/// Monotonic, process-unique alert ids starting at 1.
///
/// Lock-free. Seeded ids are reserved with [`advance_past`](Self::advance_past)
/// so generated ids never collide with them.
#[derive(Debug)]
pub struct AlertIdGenerator {
    next: AtomicU64,
}

impl AlertIdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> AlertId {
        AlertId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Guarantee every future id is greater than `id`.
    pub fn advance_past(&self, id: AlertId) {
        self.next.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for AlertIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
