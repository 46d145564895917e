use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reset_history", post(reset_history))
        .route("/full_reset", post(full_reset))
}

async fn reset_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let outcome = state.history().reset_history().await?;
    Ok(Json(outcome))
}

async fn full_reset(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let outcome = state.history().full_reset().await?;
    Ok(Json(outcome))
}
