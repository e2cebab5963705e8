use super::collections;
use super::docs::{Doc, DocStore};
use crate::error::AppError;
use crate::models::mail::MailRequest;
use serde_json::{json, Value};

/// Static reference content (learnings, the interest catalog) and the
/// mail-request sink.
pub struct ContentDb {
    docs: DocStore,
}

impl ContentDb {
    pub fn new(docs: DocStore) -> Self {
        Self { docs }
    }

    /// All learning documents with their ids injected as `id`.
    pub fn list_learnings(&self) -> Result<Vec<Value>, AppError> {
        let mut learnings = Vec::new();
        for (id, mut doc) in self.docs.list(collections::LEARNING)? {
            doc.insert("id".to_string(), json!(id));
            learnings.push(Value::Object(doc));
        }
        Ok(learnings)
    }

    pub fn get_learning(&self, id: &str) -> Result<Option<Doc>, AppError> {
        self.docs.get(collections::LEARNING, id)
    }

    /// Store a learning document under a generated id.
    pub fn add_learning(&self, doc: Doc) -> Result<String, AppError> {
        self.docs.add(collections::LEARNING, doc)
    }

    /// The interest catalog; an absent catalog reads as empty.
    pub fn interest_catalog(&self) -> Result<Vec<String>, AppError> {
        Ok(self
            .docs
            .get_field(collections::INTERESTS, "catalog", "interests")?
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default())
    }

    pub fn set_interest_catalog(&self, interests: &[String]) -> Result<(), AppError> {
        let mut fields = Doc::new();
        fields.insert("interests".to_string(), json!(interests));
        self.docs
            .set_merge(collections::INTERESTS, "catalog", fields)?;
        Ok(())
    }

    /// Persist a mail request; returns the generated document id. No
    /// delivery happens anywhere.
    pub fn queue_mail(&self, request: &MailRequest) -> Result<String, AppError> {
        let serde_json::Value::Object(mut fields) = serde_json::to_value(request)? else {
            return Err(AppError::Storage("mail request did not serialize to an object".into()));
        };
        fields.insert("queuedAt".to_string(), json!(chrono::Utc::now()));
        self.docs.add(collections::MAIL, fields)
    }
}
