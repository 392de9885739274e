//! Object storage for published feeds.

mod dir;
mod memory;

pub use dir::DirObjectStore;
pub use memory::MemoryObjectStore;

use async_trait::async_trait;

use crate::error::UnicalResult;

/// Key/value blob storage with public URLs.
///
/// `upload` always overwrites an existing object under the same key.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> UnicalResult<()>;

    async fn remove(&self, key: &str) -> UnicalResult<()>;

    fn public_url(&self, key: &str) -> String;
}
