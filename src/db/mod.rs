//! Storage layer: document access and typed collection helpers.

/// Learnings, interest catalog, and mail-request storage.
pub mod content;
/// Generic document-store operations.
pub mod docs;
/// Listing reads and mutations.
pub mod listings;
/// User profile storage.
pub mod users;


use crate::error::AppError;
use crate::models::listing::ListingType;
use docs::{Doc, DocStore};
use std::sync::Arc;

/// Collection paths. Per-user listings live in their own collection so a
/// user delete can drop them recursively.
pub mod collections {
    pub const USERS: &str = "users";
    pub const LEARNING: &str = "learning";
    pub const INTERESTS: &str = "interests";
    pub const MAIL: &str = "mail";
    pub const MATCH_CURSORS: &str = "match-cursors";

    pub fn listing(uid: &str) -> String {
        format!("users/{}/listing", uid)
    }
}

/// Database handle wiring the document store and typed sub-databases.
pub struct Database {
    pub db: Arc<sled::Db>,
    pub docs: DocStore,
    pub users: users::UserDb,
    pub listings: listings::ListingDb,
    pub content: content::ContentDb,
}

impl Database {
    /// Open the store and initialize collection helpers.
    ///
    /// # Errors
    /// Returns an error if sled cannot open the database.
    pub fn new(path: &str) -> Result<Self, AppError> {
        // Ensure the data directory exists
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let db = Arc::new(
            sled::open(path).map_err(|e| AppError::Storage(format!("cannot open {}: {}", path, e)))?,
        );
        let docs = DocStore::new(db.clone());

        Ok(Self {
            users: users::UserDb::new(docs.clone()),
            listings: listings::ListingDb::new(docs.clone()),
            content: content::ContentDb::new(docs.clone()),
            docs,
            db,
        })
    }

    /// Flush all pending writes to disk.
    ///
    /// # Errors
    /// Returns an error if sled fails to flush.
    pub fn flush(&self) -> Result<(), AppError> {
        self.db.flush()?;
        Ok(())
    }
}

/// Cross-document operations for the mutual-like promotion.
///
/// Sled transactions are limited to a single tree and each user's listing
/// is its own tree, so the promotion uses careful ordering and rollback
/// logic instead of a transaction. Concurrent mutual posts can still race
/// to two one-sided likes; see DESIGN.md.
pub struct PromotionOps;

impl PromotionOps {
    /// Move `liker`'s entry on `target`'s side from `likes` to `matches`.
    ///
    /// The snapshot stored under `target`'s likes is carried over
    /// unchanged. If the `matches` write fails after the `likes` entry was
    /// removed, the entry is restored best-effort so the pair is not lost.
    ///
    /// # Errors
    /// `NotFound` when `target` has no likes entry for `liker`; otherwise
    /// propagates storage errors.
    pub fn promote_mutual_like(
        docs: &DocStore,
        liker: &str,
        target: &str,
    ) -> Result<(), AppError> {
        let listing = collections::listing(target);
        let likes = ListingType::Likes.as_str();

        let snapshot = docs
            .get_field(&listing, likes, liker)?
            .ok_or(AppError::NotFound)?;

        docs.delete_field(&listing, likes, liker)?;

        let mut fields = Doc::new();
        fields.insert(liker.to_string(), snapshot.clone());
        if let Err(err) = docs.set_merge(&listing, ListingType::Matches.as_str(), fields) {
            // Restore the likes entry so the relationship is not dropped
            let mut rollback = Doc::new();
            rollback.insert(liker.to_string(), snapshot);
            if let Err(rollback_err) = docs.set_merge(&listing, likes, rollback) {
                tracing::error!(
                    "Failed to restore likes entry for {} after promotion failure: {}",
                    liker,
                    rollback_err
                );
            }
            return Err(err);
        }

        Ok(())
    }
}
