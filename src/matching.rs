//! Orientation-based candidate filtering and the match query composer.

use crate::db::collections;
use crate::db::docs::{Doc, DocStore};
use crate::error::AppError;
use crate::models::user::MatchQuery;
use serde_json::{json, Value};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Total over arbitrary input; anything unrecognized is `Other`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Straight,
    Transexual,
    Gay,
    Lesbian,
    Bisexual,
    Unknown,
}

impl Orientation {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "straight" => Orientation::Straight,
            "transexual" => Orientation::Transexual,
            "gay" => Orientation::Gay,
            "lesbian" => Orientation::Lesbian,
            "bisexual" => Orientation::Bisexual,
            _ => Orientation::Unknown,
        }
    }
}

/// The additional gender predicate applied to a candidate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderFilter {
    /// Candidate gender must equal the given value (`None` matches
    /// candidates with no stated gender).
    Equals(Option<Gender>),
    /// No additional filter.
    Any,
}

/// Compute the gender predicate for a requester. Total: every
/// (gender, orientation) pair maps to exactly one predicate.
///
/// The straight/transexual rows encode the upstream binary-gender
/// assumption; preserved as-is.
pub fn filter_for_orientation(
    gender: Option<Gender>,
    orientation: Option<Orientation>,
) -> GenderFilter {
    match orientation {
        Some(Orientation::Straight) | Some(Orientation::Transexual) => {
            GenderFilter::Equals(match gender {
                Some(Gender::Male) => Some(Gender::Female),
                Some(Gender::Female) => Some(Gender::Male),
                other => other,
            })
        }
        Some(Orientation::Gay) | Some(Orientation::Lesbian) => GenderFilter::Equals(gender),
        // Bisexual, unrecognized, or unspecified orientation
        _ => GenderFilter::Any,
    }
}

/// Execute the match-candidate query: exclude the requester, apply the
/// orientation predicate, require interest overlap when the requester
/// supplied interests, and order deterministically by uid.
///
/// When `write_cursor` is set, the last candidate's uid is persisted as
/// the requester's match cursor (best-effort).
///
/// # Errors
/// `BadRequest` unless at least one of uid, gender, and orientation is
/// present. An empty candidate set is `Ok(vec![])`, not an error.
pub fn find_matches(
    docs: &DocStore,
    query: &MatchQuery,
    write_cursor: bool,
) -> Result<Vec<Value>, AppError> {
    if query.uid.is_none() && query.gender.is_none() && query.orientation.is_none() {
        return Err(AppError::BadRequest(
            "at least one of uid, gender and orientation is required".to_string(),
        ));
    }

    let gender = query.gender.as_deref().map(Gender::parse);
    let orientation = query.orientation.as_deref().map(Orientation::parse);
    let filter = filter_for_orientation(gender, orientation);
    // 0 would silently suppress every candidate; treat it as unset
    let limit = query
        .limit
        .filter(|&limit| limit > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT);

    let mut candidates: Vec<(String, Doc)> = Vec::new();
    for (uid, doc) in docs.list(collections::USERS)? {
        if Some(uid.as_str()) == query.uid.as_deref() {
            continue;
        }
        if let GenderFilter::Equals(wanted) = filter {
            let candidate_gender = doc.get("gender").and_then(Value::as_str).map(Gender::parse);
            if candidate_gender != wanted {
                continue;
            }
        }
        if !query.interests.is_empty() && !shares_interest(&doc, &query.interests) {
            continue;
        }
        candidates.push((uid, doc));
    }

    // Requester-independent ordering keeps repeated queries stable
    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    candidates.truncate(limit);

    if write_cursor {
        if let (Some(requester), Some((last_uid, _))) = (query.uid.as_deref(), candidates.last()) {
            let mut fields = Doc::new();
            fields.insert("lastUid".to_string(), json!(last_uid));
            fields.insert("updatedAt".to_string(), json!(chrono::Utc::now()));
            if let Err(err) = docs.set_merge(collections::MATCH_CURSORS, requester, fields) {
                tracing::warn!("Failed to write match cursor for {}: {}", requester, err);
            }
        }
    }

    Ok(candidates
        .into_iter()
        .map(|(_, doc)| Value::Object(doc))
        .collect())
}

/// Any-of overlap between a candidate document's interests and the
/// requester's.
fn shares_interest(doc: &Doc, interests: &[String]) -> bool {
    doc.get("interests")
        .and_then(Value::as_array)
        .map(|candidate_interests| {
            candidate_interests
                .iter()
                .filter_map(Value::as_str)
                .any(|interest| interests.iter().any(|wanted| wanted == interest))
        })
        .unwrap_or(false)
}
