//! crates/dreamlog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Stored Entities
//=========================================================================================

/// Represents a registered account.
///
/// The password hash never appears here; it is only reachable through
/// [`UserCredentials`] so it cannot leak into read paths by accident.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub last_connection: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
}

/// A journal entry. Comments are not stored on the dream; they are
/// recomputed from the comments collection on every read.
#[derive(Debug, Clone)]
pub struct Dream {
    pub id: Uuid,
    pub author: Uuid,
    pub anonym: bool,
    pub content: String,
    pub title: String,
    pub topics: Vec<Uuid>,
    pub kind: Uuid,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a dream. `parent` is `None` for top-level comments and
/// points at another comment for replies.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub dream: Uuid,
    pub parent: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tag that dreams reference. Dreams carry topic ids, never the reverse.
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A dream category (serialized as `type` on the wire). One per dream.
#[derive(Debug, Clone)]
pub struct DreamType {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Reference data; no relation into dreams or comments in the current model.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a browser login session (auth cookie).
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: Uuid,
    pub token: String,
    pub user: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Incoming Attribute Sets (unvalidated)
//=========================================================================================
//
// Every field is optional so the validators can enumerate all missing or
// malformed fields in one pass instead of rejecting at deserialization.
// An absent field and an explicit null both mean "not provided", which is
// also the patch semantics: absent fields leave the entity untouched.

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDream {
    pub author: Option<Uuid>,
    pub anonym: Option<bool>,
    pub content: Option<String>,
    pub title: Option<String>,
    pub topics: Option<Vec<Uuid>>,
    pub kind: Option<Uuid>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct DreamPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub topics: Option<Vec<Uuid>>,
    pub kind: Option<Uuid>,
    pub anonym: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: Option<String>,
    pub author: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTopic {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDreamType {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewReaction {
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReactionPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
}

//=========================================================================================
// Validated Drafts (store inputs)
//=========================================================================================
//
// Produced by the validators (or assembled by the service layer after a
// validation pass). The store stamps the id and the timestamps.

#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DreamDraft {
    pub author: Uuid,
    pub anonym: bool,
    pub content: String,
    pub title: String,
    pub topics: Vec<Uuid>,
    pub kind: Uuid,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub content: String,
    pub author: Uuid,
    pub dream: Uuid,
    pub parent: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct TopicDraft {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct DreamTypeDraft {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct ReactionDraft {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone)]
pub struct RefreshTokenDraft {
    pub token: String,
    pub user: Uuid,
    pub expires_at: DateTime<Utc>,
}
