use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The four per-user listing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Likes,
    Dislikes,
    Matches,
    Invites,
}

impl ListingType {
    pub const ALL: [ListingType; 4] = [
        ListingType::Likes,
        ListingType::Dislikes,
        ListingType::Matches,
        ListingType::Invites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Likes => "likes",
            ListingType::Dislikes => "dislikes",
            ListingType::Matches => "matches",
            ListingType::Invites => "invites",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "likes" => Ok(ListingType::Likes),
            "dislikes" => Ok(ListingType::Dislikes),
            "matches" => Ok(ListingType::Matches),
            "invites" => Ok(ListingType::Invites),
            _ => Err(()),
        }
    }
}

/// Invitation payload carried by `invites` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationInfo {
    pub booking_type: String,
    pub proposed_date: String,
    #[serde(default)]
    pub request_accepted: bool,
}

/// One relationship record: a denormalized snapshot of the other user,
/// keyed inside the listing document by their uid. Unrecognized snapshot
/// fields are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_info: Option<InvitationInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response body for a listing post: the written entry, the listing type
/// it actually landed in, and whether this post completed a match.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEntryResponse {
    #[serde(flatten)]
    pub entry: ListingEntry,
    pub listing_type: ListingType,
    pub is_a_match: bool,
}
