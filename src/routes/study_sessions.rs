use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::response::{AppError, Paginated};
use crate::routes::{parse_id, PaginationQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    group_id: i64,
    study_activity_id: i64,
}

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    correct: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/:id", get(get_session))
        .route("/:id/words", get(list_session_words))
        .route("/:id/word/:word_id/review", post(review_word))
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.sessions().list_summaries(query.to_request()).await?;
    Ok(Json(Paginated::from(page)))
}

async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let summary = state
        .sessions()
        .create_session(payload.group_id, payload.study_activity_id)
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "session")?;
    let summary = state.sessions().summarize(id).await?;
    Ok(Json(summary))
}

async fn list_session_words(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "session")?;
    let page = state
        .sessions()
        .list_session_words(id, query.to_request())
        .await?;
    Ok(Json(Paginated::from(page)))
}

async fn review_word(
    State(state): State<AppState>,
    Path((id, word_id)): Path<(String, String)>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_id(&id, "session")?;
    let word_id = parse_id(&word_id, "word")?;
    let Json(payload) = payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let review = state
        .sessions()
        .record_review(session_id, word_id, payload.correct)
        .await?;

    Ok(Json(review))
}
