//! Object store backed by a local directory.
//!
//! Objects are plain files under `root`, which a static web server (or the
//! `file://` scheme) exposes at `base_url`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ObjectStore;
use crate::error::{UnicalError, UnicalResult};

pub struct DirObjectStore {
    root: PathBuf,
    base_url: String,
}

impl DirObjectStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        DirObjectStore {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> UnicalResult<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.starts_with('.');
        if !valid {
            return Err(UnicalError::Publish(format!("Invalid object key '{}'", key)));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for DirObjectStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> UnicalResult<()> {
        let path = self.object_path(key)?;
        let publish_err =
            |e: std::io::Error| UnicalError::Publish(format!("Could not write {}: {}", path.display(), e));

        tokio::fs::create_dir_all(&self.root).await.map_err(publish_err)?;

        // Write then rename so readers never see a half-written feed
        let tmp = self.root.join(format!(".{}.tmp", key));
        tokio::fs::write(&tmp, bytes).await.map_err(publish_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(publish_err)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> UnicalResult<()> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UnicalError::Publish(format!(
                "Could not remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}
