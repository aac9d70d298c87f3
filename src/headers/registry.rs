//! Per-request header registry.
//!
//! # Responsibilities
//! - Accumulate source response headers per in-flight request
//! - Hand the collected set over exactly once at composition time
//! - Reclaim entries for requests that never reached composition
//!
//! # Design Decisions
//! - Keyed by request ID; requests never share or observe each other's
//!   entries, so no cross-request locking beyond the map shards
//! - Entries are created lazily on the first recorded header and
//!   removed at drain; a periodic sweep catches abandoned requests

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use super::mapped::{add_source_mapped_header, MappedHeader};

#[derive(Debug)]
struct RequestEntry {
    created_at: Instant,
    headers: Vec<MappedHeader>,
}

/// Collects source response headers for each in-flight request.
#[derive(Debug, Default)]
pub struct HeaderRegistry {
    entries: DashMap<Uuid, RequestEntry>,
}

impl HeaderRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record one header occurrence observed on a source response.
    ///
    /// The request's entry is created on first use. Every occurrence
    /// is recorded separately; duplicate suppression happens at
    /// projection, not here.
    pub fn record(&self, request_id: Uuid, source: &str, name: &str, value: &str) {
        let mut entry = self
            .entries
            .entry(request_id)
            .or_insert_with(|| RequestEntry {
                created_at: Instant::now(),
                headers: Vec::new(),
            });
        add_source_mapped_header(&mut entry.headers, source, name, value);
    }

    /// Return and remove the request's collected headers.
    ///
    /// Draining an unknown or already-drained request yields an empty
    /// list.
    pub fn drain(&self, request_id: Uuid) -> Vec<MappedHeader> {
        self.entries
            .remove(&request_id)
            .map(|(_, entry)| entry.headers)
            .unwrap_or_default()
    }

    /// Drop entries older than `max_age` and return how many were
    /// removed. Entries this old belong to abandoned requests (client
    /// disconnect, upstream timeout) that will never drain.
    pub fn purge_stale(&self, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.created_at.elapsed() < max_age);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_entry_lazily() {
        let registry = HeaderRegistry::new();
        assert!(registry.is_empty());
        let id = Uuid::new_v4();
        registry.record(id, "products", "x-custom", "1");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_drain_removes_and_is_idempotent_safe() {
        let registry = HeaderRegistry::new();
        let id = Uuid::new_v4();
        registry.record(id, "products", "x-custom", "1");

        let drained = registry.drain(id);
        // Both views of the one observation.
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());

        assert!(registry.drain(id).is_empty());
    }

    #[test]
    fn test_requests_are_isolated() {
        let registry = HeaderRegistry::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        registry.record(first, "products", "x-a", "1");
        registry.record(second, "reviews", "x-b", "2");

        let drained = registry.drain(first);
        assert!(drained.iter().all(|h| h.source == "products"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_purge_stale_removes_only_expired_entries() {
        let registry = HeaderRegistry::new();
        let id = Uuid::new_v4();
        registry.record(id, "products", "x-custom", "1");

        assert_eq!(registry.purge_stale(Duration::from_secs(60)), 0);
        assert_eq!(registry.len(), 1);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(registry.purge_stale(Duration::from_millis(1)), 1);
        assert!(registry.is_empty());
    }
}
