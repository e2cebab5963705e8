//! Data models for API requests and persistence.

/// Listing entries, invitations, and listing types.
pub mod listing;
/// Mail request records.
pub mod mail;
/// User profiles and match queries.
pub mod user;
