use crate::{
    db::docs::Doc,
    error::AppError,
    models::listing::{ListingEntry, ListingType, PostEntryResponse},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

fn parse_listing_type(segment: &str) -> Result<ListingType, AppError> {
    segment
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown listing type: {}", segment)))
}

pub async fn get_all_listings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Doc>, AppError> {
    Ok(Json(state.db.listings.get_all(&user_id)?))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path((user_id, listing_type)): Path<(String, String)>,
) -> Result<Json<Doc>, AppError> {
    let listing_type = parse_listing_type(&listing_type)?;
    Ok(Json(state.db.listings.get_by_type(&user_id, listing_type)?))
}

pub async fn post_listing(
    State(state): State<AppState>,
    Path((user_id, listing_type)): Path<(String, String)>,
    Json(entry): Json<ListingEntry>,
) -> Result<Json<PostEntryResponse>, AppError> {
    let listing_type = parse_listing_type(&listing_type)?;
    let outcome = state.db.listings.post_entry(&user_id, listing_type, entry)?;

    if outcome.is_a_match {
        tracing::info!(uid = %user_id, other = %outcome.entry.uid, "mutual like promoted to match");
    }
    Ok(Json(PostEntryResponse {
        entry: outcome.entry,
        listing_type: outcome.listing_type,
        is_a_match: outcome.is_a_match,
    }))
}

pub async fn delete_listing_entry(
    State(state): State<AppState>,
    Path((user_id, listing_type, other_uid)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let listing_type = parse_listing_type(&listing_type)?;
    state
        .db
        .listings
        .remove_entry(&user_id, listing_type, &other_uid)?;
    Ok(Json(serde_json::json!({
        "uid": other_uid,
        "listingType": listing_type,
        "removed": true
    })))
}
