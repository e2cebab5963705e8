use super::collections;
use super::docs::{Doc, DocStore};
use super::PromotionOps;
use crate::error::AppError;
use crate::models::listing::{ListingEntry, ListingType};
use serde_json::Value;

/// Result of posting a listing entry: what was written, where it ended
/// up, and whether the post completed a mutual match.
pub struct PostOutcome {
    pub entry: ListingEntry,
    pub listing_type: ListingType,
    pub is_a_match: bool,
}

pub struct ListingDb {
    docs: DocStore,
}

impl ListingDb {
    pub fn new(docs: DocStore) -> Self {
        Self { docs }
    }

    /// Post one relationship entry for `user_id` toward `entry.uid`.
    ///
    /// A `likes` post first probes whether the target already likes the
    /// requester; if so the target's entry is promoted to `matches` and
    /// the requester's write lands in `matches` as well. Re-posting the
    /// same pair is an idempotent merge (last write wins on snapshot
    /// fields).
    ///
    /// # Errors
    /// `BadRequest` when `entry.uid` is empty or an invite carries no
    /// invitation payload. Nothing is written in either case.
    pub fn post_entry(
        &self,
        user_id: &str,
        listing_type: ListingType,
        entry: ListingEntry,
    ) -> Result<PostOutcome, AppError> {
        if entry.uid.is_empty() {
            return Err(AppError::BadRequest(
                "entry uid is a required field".to_string(),
            ));
        }
        if listing_type == ListingType::Invites && entry.invitation_info.is_none() {
            return Err(AppError::BadRequest(
                "invitationInfo is required for invites".to_string(),
            ));
        }

        let mut effective_type = listing_type;
        let mut is_a_match = false;

        if listing_type == ListingType::Likes {
            // Mutual-like test: does the target already like the requester?
            let target_listing = collections::listing(&entry.uid);
            if self
                .docs
                .field_is_set(&target_listing, ListingType::Likes.as_str(), user_id)?
            {
                PromotionOps::promote_mutual_like(&self.docs, user_id, &entry.uid)?;
                effective_type = ListingType::Matches;
                is_a_match = true;
            }
        }

        let mut fields = Doc::new();
        fields.insert(entry.uid.clone(), serde_json::to_value(&entry)?);
        self.docs.set_merge(
            &collections::listing(user_id),
            effective_type.as_str(),
            fields,
        )?;

        Ok(PostOutcome {
            entry,
            listing_type: effective_type,
            is_a_match,
        })
    }

    /// One listing document as a mapping of other-user id to entry. An
    /// absent document reads as an empty mapping.
    pub fn get_by_type(&self, user_id: &str, listing_type: ListingType) -> Result<Doc, AppError> {
        Ok(self
            .docs
            .get(&collections::listing(user_id), listing_type.as_str())?
            .unwrap_or_default())
    }

    /// All listing documents, keyed by listing type.
    pub fn get_all(&self, user_id: &str) -> Result<Doc, AppError> {
        let mut all = Doc::new();
        for (listing_type, doc) in self.docs.list(&collections::listing(user_id))? {
            all.insert(listing_type, Value::Object(doc));
        }
        Ok(all)
    }

    /// Remove exactly one entry.
    ///
    /// # Errors
    /// `NotFound` when the listing document or the entry is absent.
    pub fn remove_entry(
        &self,
        user_id: &str,
        listing_type: ListingType,
        other_uid: &str,
    ) -> Result<(), AppError> {
        self.docs.delete_field(
            &collections::listing(user_id),
            listing_type.as_str(),
            other_uid,
        )
    }
}
