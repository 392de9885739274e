//! Core library for unical.
//!
//! This crate holds everything shared by the unical CLI and server:
//! - `ics` feed decoding and encoding at a fixed organizational offset
//! - `reconcile` for replacing imported events without touching manual ones
//! - `trash` and `publish` for soft deletes and the live public feed
//! - `Schedule`, the service object that ties them to a store

pub mod analytics;
pub mod api;
pub mod error;
pub mod event;
pub mod ics;
pub mod object_store;
pub mod org_zone;
pub mod publish;
pub mod reconcile;
pub mod schedule;
pub mod store;
pub mod subject;
pub mod trash;
pub mod unical_config;

pub use error::{UnicalError, UnicalResult};
pub use event::{CandidateEvent, Event, EventDraft, Origin};
pub use org_zone::OrgZone;
pub use schedule::{Schedule, Snapshot};
pub use unical_config::UnicalConfig;
