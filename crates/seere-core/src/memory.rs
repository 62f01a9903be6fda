//! Accounting of bytes held by live codec instances.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cloneable handle to a shared counter of bytes attributed to live codec
/// instances.
///
/// One tracker is constructed per subsystem, before any stream adapter;
/// every clone updates the same counter, so adapters built on different
/// threads stay accountable to one figure. Adapters `add` their declared
/// size once at construction and `subtract` the same amount exactly once at
/// teardown, which keeps the counter from underflowing without any further
/// coordination.
///
/// Tests construct their own trackers instead of sharing process state.
#[derive(Debug, Clone, Default)]
pub struct MemoryTracker {
    bytes: Arc<AtomicUsize>,
}

impl MemoryTracker {
    /// Create a tracker with a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `n` more bytes to live codec instances.
    pub fn add(&self, n: usize) {
        self.bytes.fetch_add(n, Ordering::Relaxed);
    }

    /// Release `n` bytes previously attributed via [`add`](Self::add).
    pub fn subtract(&self, n: usize) {
        self.bytes.fetch_sub(n, Ordering::Relaxed);
    }

    /// Snapshot of the bytes currently attributed.
    ///
    /// Never torn, but may be stale by the time it is observed if other
    /// threads are updating concurrently.
    pub fn current(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_subtract() {
        let tracker = MemoryTracker::new();
        assert_eq!(tracker.current(), 0);

        tracker.add(1024);
        tracker.add(512);
        assert_eq!(tracker.current(), 1536);

        tracker.subtract(512);
        assert_eq!(tracker.current(), 1024);

        tracker.subtract(1024);
        assert_eq!(tracker.current(), 0);
    }

    #[test]
    fn test_clones_share_counter() {
        let tracker = MemoryTracker::new();
        let clone = tracker.clone();

        tracker.add(100);
        assert_eq!(clone.current(), 100);

        clone.subtract(100);
        assert_eq!(tracker.current(), 0);
    }

    #[test]
    fn test_independent_trackers() {
        let a = MemoryTracker::new();
        let b = MemoryTracker::new();

        a.add(42);
        assert_eq!(b.current(), 0);
    }

    #[test]
    fn test_concurrent_updates_balance() {
        let tracker = MemoryTracker::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        tracker.add(64);
                        tracker.subtract(64);
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(tracker.current(), 0);
    }
}
