//! Soft-delete transitions.
//!
//! Records move Active → Tombstoned → Purged. Every transition is a single
//! filtered store call whose filter includes the expected source state, so
//! a purge can never reach an active record and a restore never touches an
//! active one.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::UnicalResult;
use crate::store::{EventChange, EventFilter, EventStore};

/// Trash operations over an event store.
///
/// Each method returns how many records changed state. Zero is not an
/// error: deleting an already-tombstoned record is a no-op.
#[derive(Clone)]
pub struct TrashLedger {
    store: Arc<dyn EventStore>,
}

impl TrashLedger {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        TrashLedger { store }
    }

    /// Active → Tombstoned
    pub async fn delete(&self, id: &str, at: DateTime<Utc>) -> UnicalResult<usize> {
        self.tombstone(EventFilter::by_id(id), at).await
    }

    /// Tombstoned → Active
    pub async fn restore(&self, id: &str) -> UnicalResult<usize> {
        self.untombstone(EventFilter::by_id(id)).await
    }

    /// Tombstoned → Purged. Irreversible.
    pub async fn purge(&self, id: &str) -> UnicalResult<usize> {
        self.store.delete(&EventFilter::by_id(id).deleted()).await
    }

    pub async fn delete_by_summary(&self, summary: &str, at: DateTime<Utc>) -> UnicalResult<usize> {
        self.tombstone(EventFilter::by_summary(summary), at).await
    }

    pub async fn restore_by_summary(&self, summary: &str) -> UnicalResult<usize> {
        self.untombstone(EventFilter::by_summary(summary)).await
    }

    pub async fn purge_by_summary(&self, summary: &str) -> UnicalResult<usize> {
        self.store
            .delete(&EventFilter::by_summary(summary).deleted())
            .await
    }

    /// Tombstone every active record in one call.
    pub async fn clear_all(&self, at: DateTime<Utc>) -> UnicalResult<usize> {
        self.tombstone(EventFilter::all(), at).await
    }

    async fn tombstone(&self, filter: EventFilter, at: DateTime<Utc>) -> UnicalResult<usize> {
        self.store
            .update(&filter.active(), EventChange::SetDeletedAt(Some(at)))
            .await
    }

    async fn untombstone(&self, filter: EventFilter) -> UnicalResult<usize> {
        self.store
            .update(&filter.deleted(), EventChange::SetDeletedAt(None))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventDraft};
    use crate::store::MemoryEventStore;
    use chrono::{Duration, TimeZone};

    fn event(summary: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 9, 2, 1, 0, 0).unwrap();
        Event::manual(EventDraft::new(summary, start)).unwrap()
    }

    fn ledger_with(events: Vec<Event>) -> (MemoryEventStore, TrashLedger) {
        let store = MemoryEventStore::with_events(events);
        let ledger = TrashLedger::new(Arc::new(store.clone()));
        (store, ledger)
    }

    fn deleted_at(store: &MemoryEventStore, id: &str) -> Option<DateTime<Utc>> {
        store
            .snapshot()
            .into_iter()
            .find(|e| e.id == id)
            .and_then(|e| e.deleted_at)
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let lab = event("Lab");
        let (store, ledger) = ledger_with(vec![lab.clone()]);
        let first = Utc::now();

        assert_eq!(ledger.delete(&lab.id, first).await.unwrap(), 1);
        assert_eq!(
            ledger
                .delete(&lab.id, first + Duration::minutes(5))
                .await
                .unwrap(),
            0
        );
        assert_eq!(deleted_at(&store, &lab.id), Some(first));
    }

    #[tokio::test]
    async fn test_restore_clears_tombstone() {
        let lab = event("Lab");
        let (store, ledger) = ledger_with(vec![lab.clone()]);

        ledger.delete(&lab.id, Utc::now()).await.unwrap();
        assert_eq!(ledger.restore(&lab.id).await.unwrap(), 1);
        assert_eq!(deleted_at(&store, &lab.id), None);
        assert_eq!(ledger.restore(&lab.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_refuses_active_records() {
        let lab = event("Lab");
        let (store, ledger) = ledger_with(vec![lab.clone()]);

        assert_eq!(ledger.purge(&lab.id).await.unwrap(), 0);
        assert_eq!(store.snapshot().len(), 1);

        ledger.delete(&lab.id, Utc::now()).await.unwrap();
        assert_eq!(ledger.purge(&lab.id).await.unwrap(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_batch_restore_only_touches_tombstoned_records() {
        let old = event("Lab");
        let fresh = event("Lab");
        let other = event("Lecture");
        let (store, ledger) = ledger_with(vec![old.clone(), fresh.clone(), other.clone()]);

        ledger.delete(&old.id, Utc::now()).await.unwrap();
        ledger.delete(&other.id, Utc::now()).await.unwrap();

        assert_eq!(ledger.restore_by_summary("Lab").await.unwrap(), 1);
        assert_eq!(deleted_at(&store, &old.id), None);
        assert!(deleted_at(&store, &other.id).is_some());
    }

    #[tokio::test]
    async fn test_batch_delete_and_purge_by_summary() {
        let (store, ledger) = ledger_with(vec![event("Lab"), event("Lab"), event("Lecture")]);

        assert_eq!(ledger.delete_by_summary("Lab", Utc::now()).await.unwrap(), 2);
        assert_eq!(ledger.purge_by_summary("Lecture").await.unwrap(), 0);
        assert_eq!(ledger.purge_by_summary("Lab").await.unwrap(), 2);

        let left = store.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].summary, "Lecture");
    }

    #[tokio::test]
    async fn test_clear_all_keeps_existing_tombstones() {
        let lab = event("Lab");
        let (store, ledger) = ledger_with(vec![lab.clone(), event("Lecture")]);
        let earlier = Utc::now() - Duration::days(1);

        ledger.delete(&lab.id, earlier).await.unwrap();
        assert_eq!(ledger.clear_all(Utc::now()).await.unwrap(), 1);

        assert!(store.snapshot().iter().all(|e| e.deleted_at.is_some()));
        assert_eq!(deleted_at(&store, &lab.id), Some(earlier));
    }
}
