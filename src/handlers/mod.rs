//! HTTP request handlers.

/// Learnings and interest-catalog endpoints.
pub mod content;
/// Listing endpoints (likes, dislikes, matches, invites).
pub mod listing;
/// Email-send stub.
pub mod mail;
/// Match-discovery endpoint.
pub mod matchmaking;
/// User profile endpoints.
pub mod user;
