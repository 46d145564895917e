use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quick_stats", get(quick_stats))
        .route("/study_progress", get(study_progress))
        .route("/last_study_session", get(last_study_session))
}

async fn quick_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.metrics().quick_stats().await?;
    Ok(Json(stats))
}

async fn study_progress(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let progress = state.metrics().study_progress().await?;
    Ok(Json(progress))
}

/// Responds with JSON `null` while no session exists.
async fn last_study_session(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.metrics().last_study_session().await?;
    Ok(Json(session))
}
