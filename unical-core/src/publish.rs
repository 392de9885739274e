//! Publishing the live feed.
//!
//! The active schedule is encoded and uploaded under a per-user key of the
//! form `private-<uuid>.ics`. The key is the only secret guarding the feed,
//! so it is random and can be rotated.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::UnicalResult;
use crate::event::Event;
use crate::ics::{CONTENT_TYPE, Encoder};
use crate::object_store::ObjectStore;
use crate::store::FeedKeyStore;

/// A fresh, unguessable feed key.
pub fn mint_feed_key() -> String {
    format!("private-{}.ics", Uuid::new_v4())
}

pub struct Publisher {
    keys: Arc<dyn FeedKeyStore>,
    objects: Arc<dyn ObjectStore>,
    encoder: Encoder,
    user: String,
}

impl Publisher {
    pub fn new(
        keys: Arc<dyn FeedKeyStore>,
        objects: Arc<dyn ObjectStore>,
        encoder: Encoder,
        user: impl Into<String>,
    ) -> Self {
        Publisher {
            keys,
            objects,
            encoder,
            user: user.into(),
        }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Public URL of the current feed, if one was ever published.
    pub async fn feed_url(&self) -> UnicalResult<Option<String>> {
        let key = self.keys.feed_key(&self.user).await?;
        Ok(key.map(|k| self.objects.public_url(&k)))
    }

    /// Publish under the user's key, minting and saving one first if needed.
    pub async fn publish(&self, events: &[Event]) -> UnicalResult<String> {
        let key = match self.keys.feed_key(&self.user).await? {
            Some(key) => key,
            None => {
                let key = mint_feed_key();
                self.keys.set_feed_key(&self.user, &key).await?;
                tracing::info!(user = %self.user, "minted feed key");
                key
            }
        };

        self.upload(&key, events).await?;
        Ok(self.objects.public_url(&key))
    }

    /// Re-upload the feed if the user has published before; otherwise do nothing.
    ///
    /// This is what runs after every mutation. It never mints a key, so a
    /// user who never asked for a public link doesn't get one.
    pub async fn sync(&self, events: &[Event]) -> UnicalResult<Option<String>> {
        let Some(key) = self.keys.feed_key(&self.user).await? else {
            return Ok(None);
        };

        self.upload(&key, events).await?;
        Ok(Some(self.objects.public_url(&key)))
    }

    /// Move the feed to a new key and return its URL.
    ///
    /// Removing the old object is best effort. Once the mapping points at
    /// the new key, a leftover old object is unreachable from here.
    pub async fn regenerate(&self, events: &[Event]) -> UnicalResult<String> {
        let old_key = self.keys.feed_key(&self.user).await?;
        let new_key = mint_feed_key();

        self.upload(&new_key, events).await?;
        self.keys.set_feed_key(&self.user, &new_key).await?;

        if let Some(old_key) = old_key
            && let Err(e) = self.objects.remove(&old_key).await
        {
            tracing::warn!(key = %old_key, error = %e, "could not remove old feed");
        }

        tracing::info!(user = %self.user, "regenerated feed key");
        Ok(self.objects.public_url(&new_key))
    }

    async fn upload(&self, key: &str, events: &[Event]) -> UnicalResult<()> {
        let active: Vec<Event> = events.iter().filter(|e| e.is_active()).cloned().collect();
        let body = self.encoder.encode(&active);

        self.objects
            .upload(key, body.into_bytes(), CONTENT_TYPE)
            .await?;

        tracing::debug!(key, events = active.len(), "uploaded feed");
        Ok(())
    }
}
