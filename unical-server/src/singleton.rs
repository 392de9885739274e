//! One unical-server per user data directory.
//!
//! The server keeps the schedule view in memory, so a second server writing
//! the same event table would serve stale reads. The lock lives next to the
//! table it protects and records the holder's pid.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".server.lock";

/// Held for the life of the server. Dropping it releases the lock.
pub struct ServerLock {
    _file: File,
    path: PathBuf,
}

impl ServerLock {
    /// Lock `user_dir`, failing if another server already holds it.
    pub fn acquire(user_dir: &Path) -> Result<Self> {
        fs::create_dir_all(user_dir)
            .with_context(|| format!("Could not create {}", user_dir.display()))?;

        let path = user_dir.join(LOCK_FILE);
        // Not truncated before locking, so a running holder's pid stays readable
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .context("Failed to open lock file")?;

        if file.try_lock_exclusive().is_err() {
            let holder = fs::read_to_string(&path).unwrap_or_default();
            let holder = match holder.trim() {
                "" => String::new(),
                pid => format!(" (pid {})", pid),
            };
            anyhow::bail!(
                "Another unical-server is already serving {}{}.\n\
                If you believe this is an error, remove: {}",
                user_dir.display(),
                holder,
                path.display()
            );
        }

        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;

        Ok(ServerLock { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
