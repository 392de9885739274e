//! The schedule service.
//!
//! [`Schedule`] owns one user's cached view of the event table and is the
//! only way to change it. Callers get immutable [`Snapshot`]s.
//!
//! Writes are optimistic: the view changes first, then the store call is
//! made. If the store call fails the optimistic change is thrown away by
//! reloading the whole view from the store, and the error is returned.
//! After every successful change to the active set a republish of the
//! public feed is spawned in the background; its outcome is only logged.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::error::{UnicalError, UnicalResult};
use crate::event::{Event, EventDraft};
use crate::ics::Decoder;
use crate::publish::Publisher;
use crate::reconcile::{ImportReport, apply_import};
use crate::store::{EventChange, EventFilter, EventStore};
use crate::trash::TrashLedger;

/// Most results a search returns.
pub const SEARCH_LIMIT: usize = 50;

/// Point-in-time view of the schedule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Active events ordered by start time
    pub active: Vec<Event>,
    /// Tombstoned events, most recently deleted first
    pub trashed: Vec<Event>,
}

impl Snapshot {
    fn from_records(records: Vec<Event>) -> Self {
        let (active, trashed): (Vec<Event>, Vec<Event>) =
            records.into_iter().partition(Event::is_active);
        let mut snapshot = Snapshot { active, trashed };
        snapshot.sort();
        snapshot
    }

    pub fn find(&self, id: &str) -> Option<&Event> {
        self.active
            .iter()
            .chain(self.trashed.iter())
            .find(|e| e.id == id)
    }

    pub fn is_trashed(&self, id: &str) -> bool {
        self.trashed.iter().any(|e| e.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|e| e.id == id)
    }

    fn sort(&mut self) {
        self.active
            .sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.summary.cmp(&b.summary)));
        self.trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
    }

    fn tombstone(&mut self, matches: impl Fn(&Event) -> bool, at: DateTime<Utc>) {
        let (moved, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active).into_iter().partition(|e| matches(e));
        self.active = kept;
        self.trashed.extend(moved.into_iter().map(|mut e| {
            e.deleted_at = Some(at);
            e
        }));
        self.sort();
    }

    fn untombstone(&mut self, matches: impl Fn(&Event) -> bool) {
        let (moved, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.trashed).into_iter().partition(|e| matches(e));
        self.trashed = kept;
        self.active.extend(moved.into_iter().map(|mut e| {
            e.deleted_at = None;
            e
        }));
        self.sort();
    }

    fn drop_trashed(&mut self, matches: impl Fn(&Event) -> bool) {
        self.trashed.retain(|e| !matches(e));
    }
}

pub struct Schedule {
    store: Arc<dyn EventStore>,
    trash: TrashLedger,
    publisher: Arc<Publisher>,
    decoder: Decoder,
    view: RwLock<Arc<Snapshot>>,
    import_lock: tokio::sync::Mutex<()>,
    republishes: Mutex<Vec<JoinHandle<()>>>,
}

impl Schedule {
    /// Build the service with an empty view. Call [`Schedule::refresh`] to load it.
    pub fn new(store: Arc<dyn EventStore>, publisher: Arc<Publisher>, decoder: Decoder) -> Self {
        Schedule {
            trash: TrashLedger::new(Arc::clone(&store)),
            store,
            publisher,
            decoder,
            view: RwLock::new(Arc::new(Snapshot::default())),
            import_lock: tokio::sync::Mutex::new(()),
            republishes: Mutex::new(Vec::new()),
        }
    }

    /// Build the service and load the view from the store.
    pub async fn open(
        store: Arc<dyn EventStore>,
        publisher: Arc<Publisher>,
        decoder: Decoder,
    ) -> UnicalResult<Self> {
        let schedule = Self::new(store, publisher, decoder);
        schedule.refresh().await?;
        Ok(schedule)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        let view = self.view.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*view)
    }

    /// Replace the view with a fresh read of the store.
    pub async fn refresh(&self) -> UnicalResult<Arc<Snapshot>> {
        let records = self.store.select(&EventFilter::all()).await?;
        let snapshot = Arc::new(Snapshot::from_records(records));
        *self.view.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    pub async fn create(&self, draft: EventDraft) -> UnicalResult<Event> {
        let event = Event::manual(draft)?;

        let local = event.clone();
        self.write(
            |s| {
                s.active.push(local);
                s.sort();
            },
            async { self.store.insert(vec![event.clone()]).await.map(|()| 1usize) },
        )
        .await?;

        tracing::info!(id = %event.id, summary = %event.summary, "created event");
        self.republish();
        Ok(event)
    }

    /// Edit an active event. The edited event becomes manual.
    pub async fn update(&self, id: &str, draft: EventDraft) -> UnicalResult<Event> {
        let mut event = self
            .snapshot()
            .active
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| UnicalError::NotFound(id.to_string()))?;
        event.apply_draft(draft)?;

        let local = event.clone();
        let changed = self
            .write(
                |s| {
                    if let Some(slot) = s.active.iter_mut().find(|e| e.id == id) {
                        *slot = local;
                    }
                    s.sort();
                },
                self.store.update(
                    &EventFilter::by_id(id).active(),
                    EventChange::Replace(event.clone()),
                ),
            )
            .await?;

        self.expect_changed(id, changed).await?;
        self.republish();
        Ok(event)
    }

    /// Move an event to the trash. Deleting a trashed event does nothing.
    pub async fn delete(&self, id: &str) -> UnicalResult<()> {
        let snapshot = self.snapshot();
        if snapshot.is_trashed(id) {
            return Ok(());
        }
        if !snapshot.is_active(id) {
            return Err(UnicalError::NotFound(id.to_string()));
        }

        let now = Utc::now();
        let changed = self
            .write(|s| s.tombstone(|e| e.id == id, now), self.trash.delete(id, now))
            .await?;

        self.expect_changed(id, changed).await?;
        self.republish();
        Ok(())
    }

    /// Bring an event back from the trash. Restoring an active event does nothing.
    pub async fn restore(&self, id: &str) -> UnicalResult<()> {
        let snapshot = self.snapshot();
        if snapshot.is_active(id) {
            return Ok(());
        }
        if !snapshot.is_trashed(id) {
            return Err(UnicalError::NotFound(id.to_string()));
        }

        let changed = self
            .write(|s| s.untombstone(|e| e.id == id), self.trash.restore(id))
            .await?;

        self.expect_changed(id, changed).await?;
        self.republish();
        Ok(())
    }

    /// Permanently remove a trashed event.
    pub async fn purge(&self, id: &str) -> UnicalResult<()> {
        let snapshot = self.snapshot();
        if snapshot.is_active(id) {
            return Err(UnicalError::Validation(format!(
                "event {} is not in the trash",
                id
            )));
        }
        if !snapshot.is_trashed(id) {
            return Err(UnicalError::NotFound(id.to_string()));
        }

        let changed = self
            .write(|s| s.drop_trashed(|e| e.id == id), self.trash.purge(id))
            .await?;

        self.expect_changed(id, changed).await
    }

    pub async fn delete_by_summary(&self, summary: &str) -> UnicalResult<usize> {
        let now = Utc::now();
        let changed = self
            .write(
                |s| s.tombstone(|e| e.summary == summary, now),
                self.trash.delete_by_summary(summary, now),
            )
            .await?;

        if changed > 0 {
            self.republish();
        }
        Ok(changed)
    }

    pub async fn restore_by_summary(&self, summary: &str) -> UnicalResult<usize> {
        let changed = self
            .write(
                |s| s.untombstone(|e| e.summary == summary),
                self.trash.restore_by_summary(summary),
            )
            .await?;

        if changed > 0 {
            self.republish();
        }
        Ok(changed)
    }

    pub async fn purge_by_summary(&self, summary: &str) -> UnicalResult<usize> {
        self.write(
            |s| s.drop_trashed(|e| e.summary == summary),
            self.trash.purge_by_summary(summary),
        )
        .await
    }

    /// Move every active event to the trash.
    pub async fn clear_all(&self) -> UnicalResult<usize> {
        let now = Utc::now();
        let changed = self
            .write(|s| s.tombstone(|_| true, now), self.trash.clear_all(now))
            .await?;

        self.refresh().await?;
        tracing::info!(count = changed, "cleared schedule");
        self.republish();
        Ok(changed)
    }

    /// Replace all imported events with the ones in `text`.
    ///
    /// Imports run one at a time. The view is rebuilt from the store
    /// afterwards, whether the import succeeded or not.
    pub async fn import(&self, text: &str) -> UnicalResult<ImportReport> {
        let _guard = self.import_lock.lock().await;

        let candidates = self.decoder.decode(text);
        let report = match apply_import(self.store.as_ref(), candidates).await {
            Ok(report) => report,
            Err(e) => return Err(self.recover(e).await),
        };

        self.refresh().await?;
        tracing::info!(
            decoded = report.decoded,
            inserted = report.inserted,
            replaced = report.replaced,
            shadowed = report.shadowed,
            "imported feed"
        );
        self.republish();
        Ok(report)
    }

    /// Feed text for the active events.
    pub fn export(&self) -> String {
        self.publisher.encoder().encode(&self.snapshot().active)
    }

    /// Publish the active events now and return the public URL.
    pub async fn publish(&self) -> UnicalResult<String> {
        let url = self.publisher.publish(&self.snapshot().active).await?;
        tracing::info!(%url, "published feed");
        Ok(url)
    }

    /// Move the public feed to a new URL.
    pub async fn regenerate(&self) -> UnicalResult<String> {
        self.publisher.regenerate(&self.snapshot().active).await
    }

    pub async fn feed_url(&self) -> UnicalResult<Option<String>> {
        self.publisher.feed_url().await
    }

    /// Active events whose summary contains `query`, ignoring case.
    pub fn search(&self, query: Option<&str>, limit: usize) -> Vec<Event> {
        let needle = query.map(str::to_lowercase).unwrap_or_default();
        self.snapshot()
            .active
            .iter()
            .filter(|e| e.summary.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Distinct summaries of active events, sorted.
    pub fn subjects(&self) -> Vec<String> {
        self.snapshot()
            .active
            .iter()
            .map(|e| e.summary.clone())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Wait for every background republish started so far.
    pub async fn settle(&self) {
        let pending = std::mem::take(&mut *self.republishes.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "republish task failed");
            }
        }
    }

    /// Apply `local` to the view, then run the store call.
    async fn write<F>(&self, local: impl FnOnce(&mut Snapshot), remote: F) -> UnicalResult<usize>
    where
        F: Future<Output = UnicalResult<usize>>,
    {
        {
            let mut view = self.view.write().unwrap_or_else(|e| e.into_inner());
            let mut next = Snapshot::clone(&view);
            local(&mut next);
            *view = Arc::new(next);
        }

        match remote.await {
            Ok(changed) => Ok(changed),
            Err(e) => Err(self.recover(e).await),
        }
    }

    /// Throw away the view after a failed write and reload it from the store.
    async fn recover(&self, error: UnicalError) -> UnicalError {
        tracing::warn!(%error, "store write failed, reloading schedule");
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "could not reload schedule");
        }
        error
    }

    /// A single-record write that changed nothing means the view was stale.
    async fn expect_changed(&self, id: &str, changed: usize) -> UnicalResult<()> {
        if changed == 0 {
            self.refresh().await?;
            return Err(UnicalError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn republish(&self) {
        let publisher = Arc::clone(&self.publisher);
        let active = self.snapshot().active.clone();

        let handle = tokio::spawn(async move {
            match publisher.sync(&active).await {
                Ok(Some(url)) => tracing::debug!(%url, "republished feed"),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "republish failed"),
            }
        });

        let mut pending = self.republishes.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Origin;
    use crate::ics::Encoder;
    use crate::object_store::MemoryObjectStore;
    use crate::store::{FeedKeyStore, MemoryEventStore, MemoryFeedKeyStore};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const FEED: &str = "BEGIN:VCALENDAR\n\
BEGIN:VEVENT\nUID:a1\nSUMMARY:COMP3122 Lecture\nDTSTART:20240901T090000Z\nEND:VEVENT\n\
BEGIN:VEVENT\nUID:b2\nSUMMARY:EIE3333 Lab\nDTSTART;TZID=Asia/Hong_Kong:20240902T140000\n\
DTEND;TZID=Asia/Hong_Kong:20240902T170000\nEND:VEVENT\n\
END:VCALENDAR";

    struct Harness {
        store: MemoryEventStore,
        keys: MemoryFeedKeyStore,
        objects: MemoryObjectStore,
        schedule: Schedule,
    }

    impl Harness {
        async fn new(events: Vec<Event>) -> Self {
            let store = MemoryEventStore::with_events(events);
            let keys = MemoryFeedKeyStore::new();
            let objects = MemoryObjectStore::new();
            let publisher = Publisher::new(
                Arc::new(keys.clone()),
                Arc::new(objects.clone()),
                Encoder::default(),
                "default",
            );
            let schedule = Schedule::open(
                Arc::new(store.clone()),
                Arc::new(publisher),
                Decoder::default(),
            )
            .await
            .unwrap();

            Harness {
                store,
                keys,
                objects,
                schedule,
            }
        }

        /// Current published feed text, after background republishes finish.
        async fn published(&self) -> String {
            self.schedule.settle().await;
            let key = self.keys.feed_key("default").await.unwrap().unwrap();
            self.objects.get(&key).unwrap()
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, day, hour, 0, 0).unwrap()
    }

    fn event(summary: &str, day: u32) -> Event {
        Event::manual(EventDraft::new(summary, at(day, 1))).unwrap()
    }

    #[tokio::test]
    async fn test_open_partitions_and_orders_records() {
        let late = event("Late", 5);
        let early = event("Early", 2);
        let mut gone = event("Gone", 3);
        gone.deleted_at = Some(Utc::now());

        let h = Harness::new(vec![late.clone(), gone.clone(), early.clone()]).await;
        let snapshot = h.schedule.snapshot();

        assert_eq!(snapshot.active, vec![early, late]);
        assert_eq!(snapshot.trashed, vec![gone]);
    }

    #[tokio::test]
    async fn test_create_stores_manual_event() {
        let h = Harness::new(vec![]).await;
        let created = h
            .schedule
            .create(EventDraft::new("COMP3122 Lecture", at(2, 1)))
            .await
            .unwrap();

        assert_eq!(created.origin, Origin::Manual);
        assert_eq!(h.store.snapshot(), vec![created.clone()]);
        assert_eq!(h.schedule.snapshot().active, vec![created]);
    }

    #[tokio::test]
    async fn test_failed_write_reloads_view_from_store() {
        let existing = event("Lab", 2);
        let h = Harness::new(vec![existing.clone()]).await;

        h.store.fail_inserts(true);
        let err = h
            .schedule
            .create(EventDraft::new("Lecture", at(3, 1)))
            .await
            .unwrap_err();

        assert!(err.is_store());
        assert_eq!(h.schedule.snapshot().active, vec![existing.clone()]);

        h.store.fail_updates(true);
        assert!(h.schedule.delete(&existing.id).await.is_err());
        let snapshot = h.schedule.snapshot();
        assert_eq!(snapshot.active, vec![existing]);
        assert!(snapshot.trashed.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let h = Harness::new(vec![]).await;
        let mut draft = EventDraft::new("Lab", at(2, 3));
        draft.end = Some(at(2, 2));

        let err = h.schedule.create(draft).await.unwrap_err();
        assert!(matches!(err, UnicalError::Validation(_)));
        assert!(h.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_update_promotes_and_survives_import() {
        let h = Harness::new(vec![]).await;
        h.schedule.import(FEED).await.unwrap();

        let imported = h
            .schedule
            .snapshot()
            .active
            .iter()
            .find(|e| e.uid == "a1")
            .cloned()
            .unwrap();

        let mut draft = EventDraft::from(&imported);
        draft.location = Some("Room Y301".into());
        let edited = h.schedule.update(&imported.id, draft).await.unwrap();
        assert_eq!(edited.origin, Origin::Manual);
        assert_eq!(edited.uid, "a1");
        assert_eq!(edited.color, imported.color);

        h.schedule.import(FEED).await.unwrap();
        let a1: Vec<Event> = h
            .store
            .snapshot()
            .into_iter()
            .filter(|e| e.uid == "a1")
            .collect();
        assert_eq!(a1, vec![edited]);
    }

    #[tokio::test]
    async fn test_update_unknown_event_is_not_found() {
        let h = Harness::new(vec![]).await;
        let err = h
            .schedule
            .update("missing", EventDraft::new("Lab", at(2, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, UnicalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_import_twice_with_manual_uid() {
        let mut manual = event("My notes", 1);
        manual.uid = "a1".into();
        let h = Harness::new(vec![manual.clone()]).await;

        for _ in 0..2 {
            let report = h.schedule.import(FEED).await.unwrap();
            assert_eq!(report.inserted, 1);
            assert_eq!(report.shadowed, 1);

            let a1: Vec<Event> = h
                .schedule
                .snapshot()
                .active
                .iter()
                .filter(|e| e.uid == "a1")
                .cloned()
                .collect();
            assert_eq!(a1, vec![manual.clone()]);
        }
    }

    #[tokio::test]
    async fn test_failed_import_reloads_view() {
        let h = Harness::new(vec![]).await;
        h.schedule.import(FEED).await.unwrap();

        h.store.fail_inserts(true);
        assert!(h.schedule.import(FEED).await.is_err());
        assert!(h.schedule.snapshot().active.is_empty());

        h.store.fail_inserts(false);
        h.schedule.import(FEED).await.unwrap();
        assert_eq!(h.schedule.snapshot().active.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_publish_restore_scenario() {
        let lab = event("Lab", 2);
        let h = Harness::new(vec![lab.clone(), event("Lecture", 3)]).await;
        h.schedule.publish().await.unwrap();

        h.schedule.delete(&lab.id).await.unwrap();
        assert!(!h.published().await.contains(&lab.uid));
        assert!(h.schedule.snapshot().is_trashed(&lab.id));

        h.schedule.restore(&lab.id).await.unwrap();
        let feed = h.published().await;
        assert_eq!(feed.matches(&format!("UID:{}", lab.uid)).count(), 1);
        assert!(h.schedule.snapshot().is_active(&lab.id));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_checks_existence() {
        let lab = event("Lab", 2);
        let h = Harness::new(vec![lab.clone()]).await;

        h.schedule.delete(&lab.id).await.unwrap();
        let first = h.store.snapshot()[0].deleted_at;
        h.schedule.delete(&lab.id).await.unwrap();
        assert_eq!(h.store.snapshot()[0].deleted_at, first);

        let err = h.schedule.delete("missing").await.unwrap_err();
        assert!(matches!(err, UnicalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_purge_requires_trashed_event() {
        let lab = event("Lab", 2);
        let h = Harness::new(vec![lab.clone()]).await;

        let err = h.schedule.purge(&lab.id).await.unwrap_err();
        assert!(matches!(err, UnicalError::Validation(_)));
        assert_eq!(h.store.snapshot().len(), 1);

        h.schedule.delete(&lab.id).await.unwrap();
        h.schedule.purge(&lab.id).await.unwrap();
        assert!(h.store.snapshot().is_empty());
        assert!(h.schedule.snapshot().trashed.is_empty());
    }

    #[tokio::test]
    async fn test_batch_operations_by_summary() {
        let h = Harness::new(vec![event("Lab", 2), event("Lab", 3), event("Lecture", 4)]).await;

        assert_eq!(h.schedule.delete_by_summary("Lab").await.unwrap(), 2);
        assert_eq!(h.schedule.snapshot().trashed.len(), 2);

        assert_eq!(h.schedule.restore_by_summary("Lab").await.unwrap(), 2);
        assert_eq!(h.schedule.snapshot().active.len(), 3);

        h.schedule.delete_by_summary("Lab").await.unwrap();
        assert_eq!(h.schedule.purge_by_summary("Lab").await.unwrap(), 2);
        assert_eq!(h.store.snapshot().len(), 1);
        assert_eq!(h.schedule.snapshot().active.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_all_publishes_empty_feed() {
        let h = Harness::new(vec![event("Lab", 2), event("Lecture", 3)]).await;
        h.schedule.publish().await.unwrap();

        assert_eq!(h.schedule.clear_all().await.unwrap(), 2);
        assert!(h.schedule.snapshot().active.is_empty());
        assert_eq!(h.schedule.snapshot().trashed.len(), 2);
        assert!(!h.published().await.contains("BEGIN:VEVENT"));
    }

    #[tokio::test]
    async fn test_mutations_do_not_publish_without_a_key() {
        let h = Harness::new(vec![]).await;
        h.schedule
            .create(EventDraft::new("Lab", at(2, 1)))
            .await
            .unwrap();
        h.schedule.settle().await;

        assert!(h.objects.keys().is_empty());
        assert_eq!(h.schedule.feed_url().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_undo_mutation() {
        let h = Harness::new(vec![]).await;
        h.schedule.publish().await.unwrap();

        h.objects.fail_uploads(true);
        let created = h
            .schedule
            .create(EventDraft::new("Lab", at(2, 1)))
            .await
            .unwrap();
        h.schedule.settle().await;

        assert_eq!(h.store.snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn test_export_round_trips_active_events() {
        let h = Harness::new(vec![]).await;
        h.schedule.import(FEED).await.unwrap();

        let exported = h.schedule.export();
        let decoded = Decoder::default().decode(&exported);
        let active = h.schedule.snapshot().active.clone();

        assert_eq!(decoded.len(), active.len());
        for (candidate, event) in decoded.iter().zip(active.iter()) {
            assert_eq!(candidate.uid, event.uid);
            assert_eq!(candidate.start, event.start);
            assert_eq!(candidate.end, event.end);
        }
    }

    #[tokio::test]
    async fn test_created_event_exports_as_stored() {
        let h = Harness::new(vec![]).await;
        let draft = EventDraft {
            summary: " COMP3122 Lecture ".into(),
            location: Some("Room 1 ".into()),
            description: Some("  bring laptop\n".into()),
            start: Some(at(2, 1) + chrono::Duration::milliseconds(500)),
            end: Some(at(2, 3) + chrono::Duration::microseconds(7)),
        };
        let created = h.schedule.create(draft).await.unwrap();

        let decoded = Decoder::default().decode(&h.schedule.export());

        assert_eq!(decoded.len(), 1);
        let candidate = &decoded[0];
        assert_eq!(candidate.uid, created.uid);
        assert_eq!(candidate.summary, created.summary);
        assert_eq!(candidate.location, created.location);
        assert_eq!(candidate.description, created.description);
        assert_eq!(candidate.start, created.start);
        assert_eq!(candidate.end, created.end);
        assert_eq!(created.location.as_deref(), Some("Room 1"));
        assert_eq!(created.start, at(2, 1));
    }

    #[tokio::test]
    async fn test_search_and_subjects() {
        let mut gone = event("Hidden lab", 4);
        gone.deleted_at = Some(Utc::now());
        let h = Harness::new(vec![
            event("COMP3122 Lecture", 2),
            event("EIE3333 Lab", 3),
            event("EIE3333 Lab", 5),
            gone,
        ])
        .await;

        let labs = h.schedule.search(Some("lab"), SEARCH_LIMIT);
        assert_eq!(labs.len(), 2);
        assert!(labs.iter().all(|e| e.summary == "EIE3333 Lab"));

        assert_eq!(h.schedule.search(None, 2).len(), 2);
        assert_eq!(
            h.schedule.subjects(),
            vec!["COMP3122 Lecture".to_string(), "EIE3333 Lab".to_string()]
        );
    }
}
