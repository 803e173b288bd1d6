//! In-memory authoritative collection per view
//!
//! The store replaces the framework-managed reactive fields of the UI layer
//! with an explicit state container: every mutation builds a fresh snapshot
//! and swaps it in atomically, then publishes it on a watch channel so
//! observers only ever see complete states. Insertion order is preserved; it
//! is the default display order until an explicit sort is applied.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Record;

/// Immutable snapshot of a collection.
pub type Snapshot<R> = Arc<[R]>;

/// Ordered, copy-then-swap collection of records with snapshot publication.
///
/// All operations are synchronous and return the new snapshot; no operation
/// can leave the store partially updated because the backing sequence is
/// never mutated in place.
pub struct CollectionStore<R: Record> {
    tx: watch::Sender<Snapshot<R>>,
}

impl<R: Record> CollectionStore<R> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot::from(Vec::new()));
        Self { tx }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot<R> {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot publications. The receiver starts at the
    /// current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<R>> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Record by id, cloned out of the current snapshot.
    pub fn get(&self, id: i64) -> Option<R> {
        self.tx.borrow().iter().find(|r| r.id() == id).cloned()
    }

    /// Replace the whole collection, e.g. after a successful fetch.
    pub fn replace_all(&self, records: Vec<R>) -> Snapshot<R> {
        self.swap(records)
    }

    /// Replace the record with the same id, or append when it is new.
    pub fn upsert(&self, record: R) -> Snapshot<R> {
        let mut next: Vec<R> = self.tx.borrow().to_vec();
        match next.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record,
            None => next.push(record),
        }
        self.swap(next)
    }

    /// Filter the record with the given id out of the collection.
    pub fn remove(&self, id: i64) -> Snapshot<R> {
        let next: Vec<R> = self
            .tx
            .borrow()
            .iter()
            .filter(|r| r.id() != id)
            .cloned()
            .collect();
        self.swap(next)
    }

    fn swap(&self, next: Vec<R>) -> Snapshot<R> {
        let snapshot = Snapshot::from(next);
        self.tx.send_replace(snapshot.clone());
        snapshot
    }
}

impl<R: Record> Default for CollectionStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
