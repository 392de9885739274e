use std::sync::Arc;

use anyhow::Result;
use unical_core::ics::{Decoder, Encoder};
use unical_core::object_store::DirObjectStore;
use unical_core::publish::Publisher;
use unical_core::store::{FileEventStore, FileFeedKeyStore};
use unical_core::{Schedule, UnicalConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // One schedule for the whole process; the singleton lock keeps other
    // servers off the same files
    schedule: Arc<Schedule>,
}

impl AppState {
    pub async fn load(config: &UnicalConfig) -> Result<Self> {
        let zone = config.zone()?;
        let user_dir = config.user_path();

        let publisher = Publisher::new(
            Arc::new(FileFeedKeyStore::new(&user_dir)),
            Arc::new(DirObjectStore::new(
                config.publish_path(),
                config.public_base_url(),
            )),
            Encoder::new(zone.clone()),
            config.user.clone(),
        );

        let schedule = Schedule::open(
            Arc::new(FileEventStore::new(&user_dir)),
            Arc::new(publisher),
            Decoder::new(zone),
        )
        .await?;

        Ok(AppState::new(Arc::new(schedule)))
    }

    pub fn new(schedule: Arc<Schedule>) -> Self {
        AppState { schedule }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}
