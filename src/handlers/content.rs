use crate::{db::docs::Doc, error::AppError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

pub async fn list_learnings(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.db.content.list_learnings()?))
}

pub async fn get_learning(
    State(state): State<AppState>,
    Path(learning_id): Path<String>,
) -> Result<Json<Doc>, AppError> {
    state
        .db
        .content
        .get_learning(&learning_id)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn list_interests(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.db.content.interest_catalog()?))
}
