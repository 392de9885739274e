//! JSON-file backed stores.
//!
//! Each store keeps its whole table in one JSON file. Every call reads the
//! file, applies the change and writes it back through a temporary file and
//! a rename, so a call either lands completely or not at all.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{EventChange, EventFilter, EventStore, FeedKeyStore};
use crate::error::{UnicalError, UnicalResult};
use crate::event::Event;

const EVENTS_FILE: &str = "events.json";
const FEEDS_FILE: &str = "feeds.json";

/// Event table stored at `<dir>/events.json`.
pub struct FileEventStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileEventStore {
    pub fn new(dir: &Path) -> Self {
        FileEventStore {
            path: dir.join(EVENTS_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn select(&self, filter: &EventFilter) -> UnicalResult<Vec<Event>> {
        let _guard = self.lock.lock().await;
        let events: Vec<Event> = read_table(&self.path).await?;
        Ok(events.into_iter().filter(|e| filter.matches(e)).collect())
    }

    async fn insert(&self, new_events: Vec<Event>) -> UnicalResult<()> {
        let _guard = self.lock.lock().await;
        let mut events: Vec<Event> = read_table(&self.path).await?;

        if let Some(dup) = new_events
            .iter()
            .find(|n| events.iter().any(|e| e.id == n.id))
        {
            return Err(UnicalError::Store(format!("duplicate id {}", dup.id)));
        }

        events.extend(new_events);
        write_table(&self.path, &events).await
    }

    async fn update(&self, filter: &EventFilter, change: EventChange) -> UnicalResult<usize> {
        let _guard = self.lock.lock().await;
        let mut events: Vec<Event> = read_table(&self.path).await?;

        let mut changed = 0;
        for event in events.iter_mut().filter(|e| filter.matches(e)) {
            change.apply(event);
            changed += 1;
        }

        if changed > 0 {
            write_table(&self.path, &events).await?;
        }
        Ok(changed)
    }

    async fn delete(&self, filter: &EventFilter) -> UnicalResult<usize> {
        let _guard = self.lock.lock().await;
        let mut events: Vec<Event> = read_table(&self.path).await?;

        let before = events.len();
        events.retain(|e| !filter.matches(e));
        let removed = before - events.len();

        if removed > 0 {
            write_table(&self.path, &events).await?;
        }
        Ok(removed)
    }
}

/// User to feed key mapping stored at `<dir>/feeds.json`.
pub struct FileFeedKeyStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileFeedKeyStore {
    pub fn new(dir: &Path) -> Self {
        FileFeedKeyStore {
            path: dir.join(FEEDS_FILE),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl FeedKeyStore for FileFeedKeyStore {
    async fn feed_key(&self, user: &str) -> UnicalResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let keys: HashMap<String, String> = read_table(&self.path).await?;
        Ok(keys.get(user).cloned())
    }

    async fn set_feed_key(&self, user: &str, key: &str) -> UnicalResult<()> {
        let _guard = self.lock.lock().await;
        let mut keys: HashMap<String, String> = read_table(&self.path).await?;
        keys.insert(user.to_string(), key.to_string());
        write_table(&self.path, &keys).await
    }
}

/// Read a table, treating a missing file as empty.
async fn read_table<T: DeserializeOwned + Default>(path: &Path) -> UnicalResult<T> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(T::default()),
        Ok(content) => serde_json::from_str(&content).map_err(|e| {
            UnicalError::Store(format!("Could not parse {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(UnicalError::Store(format!(
            "Could not read {}: {}",
            path.display(),
            e
        ))),
    }
}

async fn write_table<T: Serialize>(path: &Path, table: &T) -> UnicalResult<()> {
    let store_err =
        |e: std::io::Error| UnicalError::Store(format!("Could not write {}: {}", path.display(), e));

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(store_err)?;
    }

    let content = serde_json::to_string_pretty(table)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, content).await.map_err(store_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(store_err)?;

    Ok(())
}
