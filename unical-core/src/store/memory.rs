//! In-memory stores.
//!
//! Used by tests and by callers that don't need durability. Writes can be
//! made to fail on demand to exercise the refetch and failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{EventChange, EventFilter, EventStore, FeedKeyStore};
use crate::error::{UnicalError, UnicalResult};
use crate::event::Event;

#[derive(Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<Mutex<Vec<Event>>>,
    fail_inserts: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        let store = Self::default();
        *store.events.lock().unwrap_or_else(|e| e.into_inner()) = events;
        store
    }

    /// Every stored record, in insertion order.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> UnicalResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(UnicalError::Store(format!("{} rejected", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn select(&self, filter: &EventFilter) -> UnicalResult<Vec<Event>> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        Ok(events.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn insert(&self, new_events: Vec<Event>) -> UnicalResult<()> {
        Self::check(&self.fail_inserts, "insert")?;

        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(dup) = new_events
            .iter()
            .find(|n| events.iter().any(|e| e.id == n.id))
        {
            return Err(UnicalError::Store(format!("duplicate id {}", dup.id)));
        }
        events.extend(new_events);
        Ok(())
    }

    async fn update(&self, filter: &EventFilter, change: EventChange) -> UnicalResult<usize> {
        Self::check(&self.fail_updates, "update")?;

        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let mut changed = 0;
        for event in events.iter_mut().filter(|e| filter.matches(e)) {
            change.apply(event);
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, filter: &EventFilter) -> UnicalResult<usize> {
        Self::check(&self.fail_deletes, "delete")?;

        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let before = events.len();
        events.retain(|e| !filter.matches(e));
        Ok(before - events.len())
    }
}

#[derive(Clone, Default)]
pub struct MemoryFeedKeyStore {
    keys: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryFeedKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedKeyStore for MemoryFeedKeyStore {
    async fn feed_key(&self, user: &str) -> UnicalResult<Option<String>> {
        let keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        Ok(keys.get(user).cloned())
    }

    async fn set_feed_key(&self, user: &str, key: &str) -> UnicalResult<()> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.insert(user.to_string(), key.to_string());
        Ok(())
    }
}
