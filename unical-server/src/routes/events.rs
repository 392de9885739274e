//! Read endpoints and publishing

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use unical_core::Event;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/trash", get(list_trash))
        .route("/publish", post(publish))
}

#[derive(Serialize)]
pub struct PublishResponse {
    pub url: String,
}

/// GET /events - Active events ordered by start
async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.schedule().snapshot().active.clone())
}

/// GET /trash - Trashed events, most recent first
async fn list_trash(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.schedule().snapshot().trashed.clone())
}

/// POST /publish - Publish now and return the feed URL
async fn publish(State(state): State<AppState>) -> Result<Json<PublishResponse>, AppError> {
    let url = state.schedule().publish().await?;
    Ok(Json(PublishResponse { url }))
}
