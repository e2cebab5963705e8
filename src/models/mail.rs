use serde::{Deserialize, Serialize};

/// Body of `POST /send-email`. The request is persisted as a mail
/// document; nothing is actually delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailRequest {
    #[serde(default)]
    pub to_user: String,
    #[serde(default)]
    pub from_user: String,
    #[serde(default)]
    pub message: String,
}
