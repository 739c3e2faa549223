//! crates/dreamlog_core/src/ports.rs
//!
//! Defines the persistence contract (trait) for the application's core logic.
//! The trait forms the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete document store behind it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentDraft, Dream, DreamDraft, DreamType, DreamTypeDraft, Reaction, ReactionDraft,
    RefreshToken, RefreshTokenDraft, Topic, TopicDraft, User, UserCredentials, UserDraft,
};

//=========================================================================================
// Store Error and Result Types
//=========================================================================================

/// A failure of the storage backend itself (connectivity, corrupt row, ...).
///
/// "Document absent" is never an error at this layer: lookups return
/// `Ok(None)` and the resolvers above decide which entity to report missing.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Persistence Gateway (Trait)
//=========================================================================================

/// One collection per entity, documents keyed by a store-generated id.
///
/// Creates stamp `id`, `created_at` and `updated_at`; saves refresh
/// `updated_at`. Deletes return the removed document, `None` when the id
/// was unknown. No referential or uniqueness checks happen here; the
/// validators own those.
#[async_trait]
pub trait JournalStore: Send + Sync {
    // --- Users ---
    async fn create_user(&self, draft: UserDraft) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_users(&self, skip: i64, limit: i64) -> StoreResult<Vec<User>>;

    async fn save_user(&self, user: User) -> StoreResult<User>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Uniqueness probe for the name validator. `exclude` skips one user so
    /// a patch can keep its own name.
    async fn user_name_taken(&self, name: &str, exclude: Option<Uuid>) -> StoreResult<bool>;

    /// Login-only lookup; the only path that ever reads the password hash.
    async fn find_credentials_by_name(&self, name: &str)
        -> StoreResult<Option<UserCredentials>>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;

    // --- Dreams ---
    async fn create_dream(&self, draft: DreamDraft) -> StoreResult<Dream>;

    async fn find_dream(&self, id: Uuid) -> StoreResult<Option<Dream>>;

    async fn find_dreams(&self, skip: i64, limit: i64) -> StoreResult<Vec<Dream>>;

    /// Reverse lookup backing the derived `dreams` collection on a user.
    async fn find_dreams_by_author(&self, author: Uuid) -> StoreResult<Vec<Dream>>;

    async fn save_dream(&self, dream: Dream) -> StoreResult<Dream>;

    async fn delete_dream(&self, id: Uuid) -> StoreResult<Option<Dream>>;

    // --- Comments ---
    async fn create_comment(&self, draft: CommentDraft) -> StoreResult<Comment>;

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Every comment whose `dream` reference equals the given id, in
    /// insertion order. No dream existence requirement.
    async fn find_comments_by_dream(&self, dream: Uuid) -> StoreResult<Vec<Comment>>;

    async fn save_comment(&self, comment: Comment) -> StoreResult<Comment>;

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    // --- Topics ---
    async fn create_topic(&self, draft: TopicDraft) -> StoreResult<Topic>;

    async fn find_topic(&self, id: Uuid) -> StoreResult<Option<Topic>>;

    async fn find_topics(&self, skip: i64, limit: i64) -> StoreResult<Vec<Topic>>;

    async fn save_topic(&self, topic: Topic) -> StoreResult<Topic>;

    async fn delete_topic(&self, id: Uuid) -> StoreResult<Option<Topic>>;

    /// Existence probe for the topic-reference validator.
    async fn topic_exists(&self, id: Uuid) -> StoreResult<bool>;

    // --- Dream Types ---
    async fn create_dream_type(&self, draft: DreamTypeDraft) -> StoreResult<DreamType>;

    async fn find_dream_type(&self, id: Uuid) -> StoreResult<Option<DreamType>>;

    async fn find_dream_types(&self, skip: i64, limit: i64) -> StoreResult<Vec<DreamType>>;

    async fn save_dream_type(&self, dream_type: DreamType) -> StoreResult<DreamType>;

    async fn delete_dream_type(&self, id: Uuid) -> StoreResult<Option<DreamType>>;

    // --- Reactions ---
    async fn create_reaction(&self, draft: ReactionDraft) -> StoreResult<Reaction>;

    async fn find_reaction(&self, id: Uuid) -> StoreResult<Option<Reaction>>;

    async fn find_reactions(&self, skip: i64, limit: i64) -> StoreResult<Vec<Reaction>>;

    async fn save_reaction(&self, reaction: Reaction) -> StoreResult<Reaction>;

    async fn delete_reaction(&self, id: Uuid) -> StoreResult<Option<Reaction>>;

    // --- Refresh Tokens ---
    async fn create_refresh_token(&self, draft: RefreshTokenDraft) -> StoreResult<RefreshToken>;

    async fn find_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>>;

    async fn delete_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>>;
}
