use serde::{Deserialize, Deserializer, Serialize};

/// A user profile as posted to `/user` and stored under `users/{uid}`.
///
/// Every field except `uid` is optional; absent fields are dropped from
/// the serialized form so a partial post never clobbers stored values
/// (merge upsert).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

/// Body of `POST /match-making`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    /// Accepts either a single interest or a list of them.
    #[serde(default, deserialize_with = "one_or_many")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(interest)) => vec![interest],
        Some(OneOrMany::Many(interests)) => interests,
    })
}
