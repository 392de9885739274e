//! Import reconciliation.
//!
//! An import fully replaces the imported part of the timetable. Manual
//! events always win: a candidate whose uid matches any manual record
//! (active or in the trash) is dropped without merging any fields.
//! Because old imported records are removed unconditionally and new ones
//! are derived only from the feed text, importing the same text twice
//! leaves the same set of uids behind.

use std::collections::HashSet;

use crate::error::UnicalResult;
use crate::event::{CandidateEvent, Event, Origin};
use crate::store::{EventFilter, EventStore};

/// What an import will insert. Every existing imported record goes regardless.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    /// Fresh imported records
    pub to_insert: Vec<Event>,
    /// Candidate uids dropped because a manual record owns them
    pub shadowed: Vec<String>,
}

/// Outcome of an applied import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub decoded: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub shadowed: usize,
}

/// Compute the import plan. Pure; touches no store.
pub fn reconcile_import(candidates: Vec<CandidateEvent>, manual: &[Event]) -> ImportPlan {
    let manual_uids: HashSet<&str> = manual.iter().map(|e| e.uid.as_str()).collect();

    let (kept, dropped): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| !manual_uids.contains(c.uid.as_str()));

    ImportPlan {
        to_insert: kept.into_iter().map(Event::imported).collect(),
        shadowed: dropped.into_iter().map(|c| c.uid).collect(),
    }
}

/// Reconcile candidates against the store and apply the result.
///
/// The manual set is read from the store here, right before filtering,
/// never from a cached view. Deletion happens before insertion;
/// if the insert fails the store holds no imported records until the next
/// successful import, and the error is returned to the caller.
pub async fn apply_import<S>(store: &S, candidates: Vec<CandidateEvent>) -> UnicalResult<ImportReport>
where
    S: EventStore + ?Sized,
{
    let decoded = candidates.len();
    let manual = store.select(&EventFilter::by_origin(Origin::Manual)).await?;

    let plan = reconcile_import(candidates, &manual);
    tracing::debug!(
        insert = plan.to_insert.len(),
        shadowed = plan.shadowed.len(),
        "import plan"
    );

    let replaced = store
        .delete(&EventFilter::by_origin(Origin::Imported))
        .await?;

    let inserted = plan.to_insert.len();
    if inserted > 0 {
        store.insert(plan.to_insert).await?;
    }

    Ok(ImportReport {
        decoded,
        inserted,
        replaced,
        shadowed: plan.shadowed.len(),
    })
}
