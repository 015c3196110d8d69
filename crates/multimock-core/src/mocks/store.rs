//! Ordered stub storage.
//!
//! `StubStore` keeps the stubs of one server in match order: ascending
//! priority, and among equal priorities the most recently added stub first.

use crate::matching::request_matches;
use crate::mocks::request::Request;
use crate::types::stub::StubMapping;

#[derive(Debug, Clone)]
struct StoredStub {
    /// Insertion sequence number; higher means more recent
    seq: u64,
    mapping: StubMapping,
}

/// Stub collection with priority-ordered lookup.
#[derive(Debug, Clone, Default)]
pub struct StubStore {
    /// Kept sorted in match order
    entries: Vec<StoredStub>,
    next_seq: u64,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stub. A stub with the same id is replaced.
    pub fn add(&mut self, mapping: StubMapping) {
        self.entries.retain(|entry| entry.mapping.id != mapping.id);

        let seq = self.next_seq;
        self.next_seq += 1;

        // first position whose entry would be tried after the new stub
        let position = self
            .entries
            .iter()
            .position(|entry| entry.mapping.priority >= mapping.priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, StoredStub { seq, mapping });
    }

    /// Add several stubs in order.
    pub fn add_all(&mut self, mappings: impl IntoIterator<Item = StubMapping>) {
        for mapping in mappings {
            self.add(mapping);
        }
    }

    /// Remove a stub by id.
    pub fn remove(&mut self, id: &str) -> Option<StubMapping> {
        let index = self.entries.iter().position(|e| e.mapping.id == id)?;
        Some(self.entries.remove(index).mapping)
    }

    pub fn get(&self, id: &str) -> Option<&StubMapping> {
        self.entries
            .iter()
            .find(|e| e.mapping.id == id)
            .map(|e| &e.mapping)
    }

    /// Remove every stub.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stubs in match order.
    pub fn stubs(&self) -> impl Iterator<Item = &StubMapping> {
        self.entries.iter().map(|e| &e.mapping)
    }

    /// First stub in match order whose pattern matches the request.
    pub fn find(&self, request: &Request) -> Option<&StubMapping> {
        self.stubs()
            .find(|mapping| request_matches(&mapping.request, request))
    }

    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            a.mapping.priority < b.mapping.priority
                || (a.mapping.priority == b.mapping.priority && a.seq > b.seq)
        })
    }
}
