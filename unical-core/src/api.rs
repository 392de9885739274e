//! Automation actions.
//!
//! A small JSON surface for scripts and assistants. Requests are tagged by
//! `action`:
//!
//! ```json
//! { "action": "create", "event": { "summary": "Lab", "start": "2024-09-02T06:00:00Z" } }
//! { "action": "delete", "id": "..." }
//! { "action": "search", "query": "lab" }
//! { "action": "get_subjects" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::UnicalResult;
use crate::event::{Event, EventDraft};
use crate::schedule::{SEARCH_LIMIT, Schedule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApiRequest {
    Create {
        event: EventDraft,
    },
    Delete {
        id: String,
    },
    Search {
        #[serde(default)]
        query: Option<String>,
    },
    GetSubjects,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Created { success: bool, event: Event },
    Deleted { success: bool, id: String },
    Events { events: Vec<Event> },
    Subjects { subjects: Vec<String> },
}

/// Run one action against the schedule.
pub async fn dispatch(schedule: &Schedule, request: ApiRequest) -> UnicalResult<ApiResponse> {
    tracing::debug!(?request, "api request");

    match request {
        ApiRequest::Create { event } => {
            let event = schedule.create(event).await?;
            Ok(ApiResponse::Created {
                success: true,
                event,
            })
        }
        ApiRequest::Delete { id } => {
            schedule.delete(&id).await?;
            Ok(ApiResponse::Deleted { success: true, id })
        }
        ApiRequest::Search { query } => Ok(ApiResponse::Events {
            events: schedule.search(query.as_deref(), SEARCH_LIMIT),
        }),
        ApiRequest::GetSubjects => Ok(ApiResponse::Subjects {
            subjects: schedule.subjects(),
        }),
    }
}
