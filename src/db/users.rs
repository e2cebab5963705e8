use super::collections;
use super::docs::{Doc, DocStore};
use crate::error::AppError;
use crate::models::user::UserProfile;

pub struct UserDb {
    docs: DocStore,
}

impl UserDb {
    pub fn new(docs: DocStore) -> Self {
        Self { docs }
    }

    /// Merge-upsert a profile; fields absent from `profile` keep their
    /// stored values. Returns the merged document.
    pub fn upsert(&self, profile: &UserProfile) -> Result<Doc, AppError> {
        let serde_json::Value::Object(fields) = serde_json::to_value(profile)? else {
            return Err(AppError::Storage("profile did not serialize to an object".into()));
        };
        self.docs.set_merge(collections::USERS, &profile.uid, fields)
    }

    pub fn get(&self, uid: &str) -> Result<Option<Doc>, AppError> {
        self.docs.get(collections::USERS, uid)
    }

    pub fn exists(&self, uid: &str) -> Result<bool, AppError> {
        self.docs.exists(collections::USERS, uid)
    }

    /// Delete a profile together with its subordinate data: the per-user
    /// listing collection and any match cursor.
    ///
    /// # Errors
    /// `NotFound` when no such user exists.
    pub fn delete(&self, uid: &str) -> Result<(), AppError> {
        if !self.exists(uid)? {
            return Err(AppError::NotFound);
        }
        self.docs.drop_collection(&collections::listing(uid))?;
        self.docs.remove(collections::MATCH_CURSORS, uid)?;
        self.docs.remove(collections::USERS, uid)?;
        Ok(())
    }
}
