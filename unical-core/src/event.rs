//! Timetable event records.
//!
//! An [`Event`] is the stored record. A [`CandidateEvent`] is what the feed
//! decoder produces before reconciliation assigns it an id and provenance,
//! and an [`EventDraft`] is the editable shape used for manual authoring.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{UnicalError, UnicalResult};
use crate::subject::subject_color;

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Authored or edited by the user. Never touched by an import.
    Manual,
    /// Produced by the last import. Replaced wholesale by the next one.
    Imported,
}

/// A stored timetable event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Internal record id, stable for the lifetime of the record
    pub id: String,
    /// Feed identity (the UID property), used to match manual and imported events
    pub uid: String,
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub origin: Origin,
    /// Display color derived from the summary's subject code
    pub color: String,
    /// Soft-delete time. `None` means the event is active.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// An event decoded from a feed, not yet reconciled into the store
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEvent {
    pub uid: String,
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// User-supplied fields for creating or editing an event
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

/// Events without an explicit end last this long.
pub fn default_duration() -> Duration {
    Duration::hours(1)
}

impl Event {
    /// Create a manual event from a validated draft, with fresh id and uid.
    pub fn manual(draft: EventDraft) -> UnicalResult<Self> {
        let (start, end) = draft.validate()?;
        let summary = draft.summary.trim().to_string();

        Ok(Event {
            id: Uuid::new_v4().to_string(),
            uid: Uuid::new_v4().to_string(),
            color: subject_color(&summary).to_string(),
            summary,
            location: non_empty(draft.location),
            description: non_empty(draft.description),
            start,
            end,
            origin: Origin::Manual,
            deleted_at: None,
        })
    }

    /// Turn a decoded candidate into a fresh imported record.
    pub fn imported(candidate: CandidateEvent) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            uid: candidate.uid,
            color: subject_color(&candidate.summary).to_string(),
            summary: candidate.summary,
            location: non_empty(candidate.location),
            description: non_empty(candidate.description),
            start: candidate.start,
            end: candidate.end,
            origin: Origin::Imported,
            deleted_at: None,
        }
    }

    /// Apply an edit. Edited events become manual so later imports keep the edit.
    ///
    /// The color is recomputed only when the summary changes.
    pub fn apply_draft(&mut self, draft: EventDraft) -> UnicalResult<()> {
        let (start, end) = draft.validate()?;
        let summary = draft.summary.trim().to_string();

        if summary != self.summary {
            self.color = subject_color(&summary).to_string();
        }
        self.summary = summary;
        self.location = non_empty(draft.location);
        self.description = non_empty(draft.description);
        self.start = start;
        self.end = end;
        self.origin = Origin::Manual;

        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn is_manual(&self) -> bool {
        self.origin == Origin::Manual
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

impl EventDraft {
    pub fn new(summary: impl Into<String>, start: DateTime<Utc>) -> Self {
        EventDraft {
            summary: summary.into(),
            start: Some(start),
            ..Default::default()
        }
    }

    /// Check required fields and resolve the end time.
    ///
    /// Times are cut to whole seconds, the precision a feed can carry.
    pub fn validate(&self) -> UnicalResult<(DateTime<Utc>, DateTime<Utc>)> {
        if self.summary.trim().is_empty() {
            return Err(UnicalError::Validation("summary is required".into()));
        }

        let start = self
            .start
            .ok_or_else(|| UnicalError::Validation("start time is required".into()))?
            .trunc_subsecs(0);
        let end = match self.end {
            Some(end) => end.trunc_subsecs(0),
            None => start
                .checked_add_signed(default_duration())
                .ok_or_else(|| UnicalError::Validation("start time is out of range".into()))?,
        };

        if !in_feed_range(start) || !in_feed_range(end) {
            return Err(UnicalError::Validation(
                "times must fall within years 0000 to 9999".into(),
            ));
        }

        if end <= start {
            return Err(UnicalError::Validation(
                "end time must be after start time".into(),
            ));
        }

        Ok((start, end))
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        EventDraft {
            summary: event.summary.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            start: Some(event.start),
            end: Some(event.end),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Whether an instant has a four-digit local year at any UTC offset.
///
/// Offsets stay under a day, so the first and last UTC day are excluded.
fn in_feed_range(instant: DateTime<Utc>) -> bool {
    let date = instant.date_naive();
    let (year, day) = (date.year(), date.ordinal());
    let after_first_day = year > 0 || (year == 0 && day > 1);
    let before_last_day = year < 9999 || (year == 9999 && day < 365);
    after_first_day && before_last_day
}
