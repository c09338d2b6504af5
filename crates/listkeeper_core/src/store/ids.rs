//! Id sources for the in-memory backend.

use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out ids that are unique for the lifetime of the generator.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

/// Monotonic counter shared by every session of a process.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first id is `1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
