use crate::{error::AppError, models::mail::MailRequest, AppState};
use axum::{extract::State, Json};
use serde_json::json;

pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<MailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.to_user.is_empty() || request.from_user.is_empty() {
        return Err(AppError::BadRequest(
            "toUser and fromUser are required fields".to_string(),
        ));
    }
    if request.message.is_empty() {
        return Err(AppError::BadRequest("message is a required field".to_string()));
    }

    let id = state.db.content.queue_mail(&request)?;
    tracing::info!(id = %id, to = %request.to_user, "queued mail request");
    Ok(Json(json!({
        "id": id,
        "toUser": request.to_user,
        "fromUser": request.from_user
    })))
}
