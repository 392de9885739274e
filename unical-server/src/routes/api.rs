//! Automation endpoint

use axum::{Json, Router, extract::State, routing::post};
use unical_core::api::{ApiRequest, ApiResponse, dispatch};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api", post(run_action))
}

/// POST /api - Run one tagged action
async fn run_action(
    State(state): State<AppState>,
    Json(request): Json<ApiRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    let response = dispatch(state.schedule(), request).await?;
    Ok(Json(response))
}
