use crate::{error::AppError, matching, models::user::MatchQuery, AppState};
use axum::{extract::State, Json};
use serde_json::Value;

pub async fn find_matches(
    State(state): State<AppState>,
    Json(query): Json<MatchQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let candidates =
        matching::find_matches(&state.db.docs, &query, state.config.match_cursor_enabled)?;
    tracing::debug!(
        uid = query.uid.as_deref().unwrap_or("-"),
        count = candidates.len(),
        "match query"
    );
    Ok(Json(candidates))
}
