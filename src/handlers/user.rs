use crate::{db::docs::Doc, error::AppError, models::user::UserProfile, AppState};
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn create_user(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<Doc>, AppError> {
    if profile.uid.is_empty() {
        return Err(AppError::BadRequest("uid is a required field".to_string()));
    }

    tracing::info!(uid = %profile.uid, "upserting profile");
    let merged = state.db.users.upsert(&profile)?;
    Ok(Json(merged))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Doc>, AppError> {
    state
        .db
        .users
        .get(&user_id)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.users.delete(&user_id)?;
    tracing::info!(uid = %user_id, "deleted user and listings");
    Ok(Json(serde_json::json!({ "uid": user_id, "deleted": true })))
}
