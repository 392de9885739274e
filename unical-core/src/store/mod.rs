//! Durable record storage.
//!
//! The store is the source of truth for one user's events. Every call is
//! atomic on its own; nothing here offers multi-call transactions.

mod file;
mod memory;

pub use file::{FileEventStore, FileFeedKeyStore};
pub use memory::{MemoryEventStore, MemoryFeedKeyStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::UnicalResult;
use crate::event::{Event, Origin};

/// Tombstone column predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tombstone {
    /// `deleted_at IS NULL`
    Active,
    /// `deleted_at IS NOT NULL`
    Deleted,
}

/// Conjunction of equality and null predicates over the event table.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub origin: Option<Origin>,
    pub tombstone: Option<Tombstone>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        EventFilter {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn by_summary(summary: &str) -> Self {
        EventFilter {
            summary: Some(summary.to_string()),
            ..Default::default()
        }
    }

    pub fn by_origin(origin: Origin) -> Self {
        EventFilter {
            origin: Some(origin),
            ..Default::default()
        }
    }

    pub fn active(mut self) -> Self {
        self.tombstone = Some(Tombstone::Active);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.tombstone = Some(Tombstone::Deleted);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.id.as_ref().is_none_or(|id| *id == event.id)
            && self.summary.as_ref().is_none_or(|s| *s == event.summary)
            && self.origin.is_none_or(|o| o == event.origin)
            && self.tombstone.is_none_or(|t| match t {
                Tombstone::Active => event.deleted_at.is_none(),
                Tombstone::Deleted => event.deleted_at.is_some(),
            })
    }
}

/// A change applied to every record matching a filter
#[derive(Debug, Clone, PartialEq)]
pub enum EventChange {
    /// Replace the stored record with this one (its `id` is kept)
    Replace(Event),
    /// Set or clear the tombstone
    SetDeletedAt(Option<DateTime<Utc>>),
}

impl EventChange {
    pub fn apply(&self, event: &mut Event) {
        match self {
            EventChange::Replace(replacement) => {
                let id = std::mem::take(&mut event.id);
                *event = replacement.clone();
                event.id = id;
            }
            EventChange::SetDeletedAt(deleted_at) => event.deleted_at = *deleted_at,
        }
    }
}

/// Event table for one user.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    async fn select(&self, filter: &EventFilter) -> UnicalResult<Vec<Event>>;

    async fn insert(&self, events: Vec<Event>) -> UnicalResult<()>;

    /// Returns the number of records changed.
    async fn update(&self, filter: &EventFilter, change: EventChange) -> UnicalResult<usize>;

    /// Returns the number of records removed.
    async fn delete(&self, filter: &EventFilter) -> UnicalResult<usize>;
}

/// Maps a user to the object key of their published feed.
#[async_trait]
pub trait FeedKeyStore: Send + Sync + 'static {
    async fn feed_key(&self, user: &str) -> UnicalResult<Option<String>>;

    async fn set_feed_key(&self, user: &str, key: &str) -> UnicalResult<()>;
}
