use crate::error::AppError;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// A stored document: a JSON object keyed by field name.
pub type Doc = Map<String, Value>;

/// Generic document access over sled. Each collection path maps to one
/// sled tree; documents are JSON objects so merge writes can operate on
/// individual fields.
#[derive(Clone)]
pub struct DocStore {
    db: Arc<sled::Db>,
}

impl DocStore {
    pub fn new(db: Arc<sled::Db>) -> Self {
        Self { db }
    }

    fn tree(&self, collection: &str) -> Result<sled::Tree, AppError> {
        Ok(self.db.open_tree(collection)?)
    }

    /// Point lookup. An absent document is `None`, not an error.
    pub fn get(&self, collection: &str, id: &str) -> Result<Option<Doc>, AppError> {
        match self.tree(collection)?.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read one field of a document, if the document and field exist.
    pub fn get_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
    ) -> Result<Option<Value>, AppError> {
        Ok(self
            .get(collection, id)?
            .and_then(|doc| doc.get(field).cloned()))
    }

    /// Truthiness probe on a single field. An absent document, absent
    /// field, `null`, or `false` all read as `false`.
    pub fn field_is_set(&self, collection: &str, id: &str, field: &str) -> Result<bool, AppError> {
        Ok(self
            .get_field(collection, id, field)?
            .map(|value| !matches!(value, Value::Null | Value::Bool(false)))
            .unwrap_or(false))
    }

    /// Merge upsert: fields present in `fields` overwrite, everything
    /// else on an existing document is preserved. Returns the merged
    /// document.
    pub fn set_merge(&self, collection: &str, id: &str, fields: Doc) -> Result<Doc, AppError> {
        let merged = self.tree(collection)?.update_and_fetch(id.as_bytes(), |old| {
            let mut doc: Doc = old
                .and_then(|bytes| serde_json::from_slice(bytes).ok())
                .unwrap_or_default();
            for (key, value) in fields.clone() {
                doc.insert(key, value);
            }
            serde_json::to_vec(&doc).ok()
        })?;

        match merged {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Err(AppError::Storage(format!(
                "merge write produced no document for {}/{}",
                collection, id
            ))),
        }
    }

    /// Insert a new document under a generated id and return the id.
    pub fn add(&self, collection: &str, fields: Doc) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        self.tree(collection)?
            .insert(id.as_bytes(), serde_json::to_vec(&Value::Object(fields))?)?;
        Ok(id)
    }

    /// Remove exactly one field from a document. Fails with `NotFound`
    /// when the document or the field is absent; never silently succeeds.
    ///
    /// Runs inside `update_and_fetch` so a concurrent merge on the same
    /// document cannot be lost between read and write.
    pub fn delete_field(&self, collection: &str, id: &str, field: &str) -> Result<(), AppError> {
        let mut removed = false;
        self.tree(collection)?.update_and_fetch(id.as_bytes(), |old| {
            // The closure can re-run on contention; recompute from scratch
            removed = false;
            let mut doc: Doc = serde_json::from_slice(old?).ok()?;
            removed = doc.remove(field).is_some();
            serde_json::to_vec(&doc).ok()
        })?;

        if removed {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Full scan of a collection, ordered by document id.
    pub fn list(&self, collection: &str) -> Result<Vec<(String, Doc)>, AppError> {
        let mut docs = Vec::new();
        for item in self.tree(collection)?.iter() {
            let (key, value) = item?;
            let id = String::from_utf8_lossy(&key).into_owned();
            docs.push((id, serde_json::from_slice(&value)?));
        }
        Ok(docs)
    }

    pub fn exists(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        Ok(self.tree(collection)?.contains_key(id.as_bytes())?)
    }

    /// Delete one document; `true` when something was removed.
    pub fn remove(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        Ok(self.tree(collection)?.remove(id.as_bytes())?.is_some())
    }

    /// Recursive delete of an entire collection.
    pub fn drop_collection(&self, collection: &str) -> Result<(), AppError> {
        self.db.drop_tree(collection)?;
        Ok(())
    }
}
