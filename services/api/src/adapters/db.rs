//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `JournalStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! The schema carries no foreign keys and no unique indexes on purpose:
//! referential and uniqueness enforcement belong to the core validators, and
//! the tables keep accepting orphans the way the document model did.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use dreamlog_core::domain::{
    Comment, CommentDraft, Dream, DreamDraft, DreamType, DreamTypeDraft, Reaction, ReactionDraft,
    RefreshToken, RefreshTokenDraft, Topic, TopicDraft, User, UserCredentials, UserDraft,
};
use dreamlog_core::ports::{JournalStore, StoreError, StoreResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `JournalStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: Option<String>,
    description: Option<String>,
    avatar: Option<String>,
    last_connection: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn into_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            description: self.description,
            avatar: self.avatar,
            last_connection: self.last_connection,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    name: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn into_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            name: self.name,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct DreamRecord {
    id: Uuid,
    author: Uuid,
    anonym: bool,
    content: String,
    title: String,
    topics: Vec<Uuid>,
    kind: Uuid,
    published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl DreamRecord {
    fn into_domain(self) -> Dream {
        Dream {
            id: self.id,
            author: self.author,
            anonym: self.anonym,
            content: self.content,
            title: self.title,
            topics: self.topics,
            kind: self.kind,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CommentRecord {
    id: Uuid,
    content: String,
    author: Uuid,
    dream: Uuid,
    parent: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CommentRecord {
    fn into_domain(self) -> Comment {
        Comment {
            id: self.id,
            content: self.content,
            author: self.author,
            dream: self.dream,
            parent: self.parent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct TopicRecord {
    id: Uuid,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl TopicRecord {
    fn into_domain(self) -> Topic {
        Topic {
            id: self.id,
            name: self.name,
            color: self.color,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct DreamTypeRecord {
    id: Uuid,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl DreamTypeRecord {
    fn into_domain(self) -> DreamType {
        DreamType {
            id: self.id,
            name: self.name,
            color: self.color,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ReactionRecord {
    id: Uuid,
    name: String,
    icon: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ReactionRecord {
    fn into_domain(self) -> Reaction {
        Reaction {
            id: self.id,
            name: self.name,
            icon: self.icon,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct RefreshTokenRecord {
    id: Uuid,
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}
impl RefreshTokenRecord {
    fn into_domain(self) -> RefreshToken {
        RefreshToken {
            id: self.id,
            token: self.token,
            user: self.user_id,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `JournalStore` Trait Implementation
//=========================================================================================

const USER_COLUMNS: &str =
    "id, name, email, description, avatar, last_connection, created_at, updated_at";
const DREAM_COLUMNS: &str =
    "id, author, anonym, content, title, topics, kind, published, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, content, author, dream, parent, created_at, updated_at";

#[async_trait]
impl JournalStore for DbAdapter {
    // --- Users ---
    async fn create_user(&self, draft: UserDraft) -> StoreResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, name, email, password_hash, description, avatar) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(draft.name)
        .bind(draft.email)
        .bind(draft.password_hash)
        .bind(draft.description)
        .bind(draft.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(UserRecord::into_domain))
    }

    async fn find_users(&self, skip: i64, limit: i64) -> StoreResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.into_iter().map(UserRecord::into_domain).collect())
    }

    async fn save_user(&self, user: User) -> StoreResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET name = $2, email = $3, description = $4, avatar = $5, \
             last_connection = $6, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.description)
        .bind(&user.avatar)
        .bind(user.last_connection)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        // A concurrently deleted row makes the save a silent no-op.
        Ok(record.map(UserRecord::into_domain).unwrap_or(user))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(UserRecord::into_domain))
    }

    async fn user_name_taken(&self, name: &str, exclude: Option<Uuid>) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn find_credentials_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, name, password_hash FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(CredentialsRecord::into_domain))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    // --- Dreams ---
    async fn create_dream(&self, draft: DreamDraft) -> StoreResult<Dream> {
        let record = sqlx::query_as::<_, DreamRecord>(&format!(
            "INSERT INTO dreams (id, author, anonym, content, title, topics, kind, published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {DREAM_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(draft.author)
        .bind(draft.anonym)
        .bind(draft.content)
        .bind(draft.title)
        .bind(draft.topics)
        .bind(draft.kind)
        .bind(draft.published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_dream(&self, id: Uuid) -> StoreResult<Option<Dream>> {
        let record = sqlx::query_as::<_, DreamRecord>(&format!(
            "SELECT {DREAM_COLUMNS} FROM dreams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(DreamRecord::into_domain))
    }

    async fn find_dreams(&self, skip: i64, limit: i64) -> StoreResult<Vec<Dream>> {
        let records = sqlx::query_as::<_, DreamRecord>(&format!(
            "SELECT {DREAM_COLUMNS} FROM dreams ORDER BY created_at ASC OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.into_iter().map(DreamRecord::into_domain).collect())
    }

    async fn find_dreams_by_author(&self, author: Uuid) -> StoreResult<Vec<Dream>> {
        let records = sqlx::query_as::<_, DreamRecord>(&format!(
            "SELECT {DREAM_COLUMNS} FROM dreams WHERE author = $1 ORDER BY created_at ASC"
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.into_iter().map(DreamRecord::into_domain).collect())
    }

    async fn save_dream(&self, dream: Dream) -> StoreResult<Dream> {
        let record = sqlx::query_as::<_, DreamRecord>(&format!(
            "UPDATE dreams SET author = $2, anonym = $3, content = $4, title = $5, topics = $6, \
             kind = $7, published = $8, updated_at = now() WHERE id = $1 RETURNING {DREAM_COLUMNS}"
        ))
        .bind(dream.id)
        .bind(dream.author)
        .bind(dream.anonym)
        .bind(&dream.content)
        .bind(&dream.title)
        .bind(&dream.topics)
        .bind(dream.kind)
        .bind(dream.published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(DreamRecord::into_domain).unwrap_or(dream))
    }

    async fn delete_dream(&self, id: Uuid) -> StoreResult<Option<Dream>> {
        let record = sqlx::query_as::<_, DreamRecord>(&format!(
            "DELETE FROM dreams WHERE id = $1 RETURNING {DREAM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(DreamRecord::into_domain))
    }

    // --- Comments ---
    async fn create_comment(&self, draft: CommentDraft) -> StoreResult<Comment> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "INSERT INTO comments (id, content, author, dream, parent) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(draft.content)
        .bind(draft.author)
        .bind(draft.dream)
        .bind(draft.parent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(CommentRecord::into_domain))
    }

    async fn find_comments_by_dream(&self, dream: Uuid) -> StoreResult<Vec<Comment>> {
        // seq is a bigserial; ordering by it preserves true insertion order
        // even when two inserts share a timestamp.
        let records = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE dream = $1 ORDER BY seq ASC"
        ))
        .bind(dream)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.into_iter().map(CommentRecord::into_domain).collect())
    }

    async fn save_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "UPDATE comments SET content = $2, author = $3, dream = $4, parent = $5, \
             updated_at = now() WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.author)
        .bind(comment.dream)
        .bind(comment.parent)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(CommentRecord::into_domain).unwrap_or(comment))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "DELETE FROM comments WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(CommentRecord::into_domain))
    }

    // --- Topics ---
    async fn create_topic(&self, draft: TopicDraft) -> StoreResult<Topic> {
        let record = sqlx::query_as::<_, TopicRecord>(
            "INSERT INTO topics (id, name, color) VALUES ($1, $2, $3) \
             RETURNING id, name, color, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(draft.name)
        .bind(draft.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_topic(&self, id: Uuid) -> StoreResult<Option<Topic>> {
        let record = sqlx::query_as::<_, TopicRecord>(
            "SELECT id, name, color, created_at, updated_at FROM topics WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(TopicRecord::into_domain))
    }

    async fn find_topics(&self, skip: i64, limit: i64) -> StoreResult<Vec<Topic>> {
        let records = sqlx::query_as::<_, TopicRecord>(
            "SELECT id, name, color, created_at, updated_at FROM topics \
             ORDER BY created_at ASC OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.into_iter().map(TopicRecord::into_domain).collect())
    }

    async fn save_topic(&self, topic: Topic) -> StoreResult<Topic> {
        let record = sqlx::query_as::<_, TopicRecord>(
            "UPDATE topics SET name = $2, color = $3, updated_at = now() WHERE id = $1 \
             RETURNING id, name, color, created_at, updated_at",
        )
        .bind(topic.id)
        .bind(&topic.name)
        .bind(&topic.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(TopicRecord::into_domain).unwrap_or(topic))
    }

    async fn delete_topic(&self, id: Uuid) -> StoreResult<Option<Topic>> {
        let record = sqlx::query_as::<_, TopicRecord>(
            "DELETE FROM topics WHERE id = $1 RETURNING id, name, color, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(TopicRecord::into_domain))
    }

    async fn topic_exists(&self, id: Uuid) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM topics WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    // --- Dream Types ---
    async fn create_dream_type(&self, draft: DreamTypeDraft) -> StoreResult<DreamType> {
        let record = sqlx::query_as::<_, DreamTypeRecord>(
            "INSERT INTO dream_types (id, name, color) VALUES ($1, $2, $3) \
             RETURNING id, name, color, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(draft.name)
        .bind(draft.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_dream_type(&self, id: Uuid) -> StoreResult<Option<DreamType>> {
        let record = sqlx::query_as::<_, DreamTypeRecord>(
            "SELECT id, name, color, created_at, updated_at FROM dream_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(DreamTypeRecord::into_domain))
    }

    async fn find_dream_types(&self, skip: i64, limit: i64) -> StoreResult<Vec<DreamType>> {
        let records = sqlx::query_as::<_, DreamTypeRecord>(
            "SELECT id, name, color, created_at, updated_at FROM dream_types \
             ORDER BY created_at ASC OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records
            .into_iter()
            .map(DreamTypeRecord::into_domain)
            .collect())
    }

    async fn save_dream_type(&self, dream_type: DreamType) -> StoreResult<DreamType> {
        let record = sqlx::query_as::<_, DreamTypeRecord>(
            "UPDATE dream_types SET name = $2, color = $3, updated_at = now() WHERE id = $1 \
             RETURNING id, name, color, created_at, updated_at",
        )
        .bind(dream_type.id)
        .bind(&dream_type.name)
        .bind(&dream_type.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(DreamTypeRecord::into_domain).unwrap_or(dream_type))
    }

    async fn delete_dream_type(&self, id: Uuid) -> StoreResult<Option<DreamType>> {
        let record = sqlx::query_as::<_, DreamTypeRecord>(
            "DELETE FROM dream_types WHERE id = $1 \
             RETURNING id, name, color, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(DreamTypeRecord::into_domain))
    }

    // --- Reactions ---
    async fn create_reaction(&self, draft: ReactionDraft) -> StoreResult<Reaction> {
        let record = sqlx::query_as::<_, ReactionRecord>(
            "INSERT INTO reactions (id, name, icon) VALUES ($1, $2, $3) \
             RETURNING id, name, icon, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(draft.name)
        .bind(draft.icon)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_reaction(&self, id: Uuid) -> StoreResult<Option<Reaction>> {
        let record = sqlx::query_as::<_, ReactionRecord>(
            "SELECT id, name, icon, created_at, updated_at FROM reactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(ReactionRecord::into_domain))
    }

    async fn find_reactions(&self, skip: i64, limit: i64) -> StoreResult<Vec<Reaction>> {
        let records = sqlx::query_as::<_, ReactionRecord>(
            "SELECT id, name, icon, created_at, updated_at FROM reactions \
             ORDER BY created_at ASC OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.into_iter().map(ReactionRecord::into_domain).collect())
    }

    async fn save_reaction(&self, reaction: Reaction) -> StoreResult<Reaction> {
        let record = sqlx::query_as::<_, ReactionRecord>(
            "UPDATE reactions SET name = $2, icon = $3, updated_at = now() WHERE id = $1 \
             RETURNING id, name, icon, created_at, updated_at",
        )
        .bind(reaction.id)
        .bind(&reaction.name)
        .bind(&reaction.icon)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(ReactionRecord::into_domain).unwrap_or(reaction))
    }

    async fn delete_reaction(&self, id: Uuid) -> StoreResult<Option<Reaction>> {
        let record = sqlx::query_as::<_, ReactionRecord>(
            "DELETE FROM reactions WHERE id = $1 \
             RETURNING id, name, icon, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(ReactionRecord::into_domain))
    }

    // --- Refresh Tokens ---
    async fn create_refresh_token(&self, draft: RefreshTokenDraft) -> StoreResult<RefreshToken> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "INSERT INTO refresh_tokens (id, token, user_id, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING id, token, user_id, expires_at, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(draft.token)
        .bind(draft.user)
        .bind(draft.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.into_domain())
    }

    async fn find_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, token, user_id, expires_at, created_at FROM refresh_tokens \
             WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(RefreshTokenRecord::into_domain))
    }

    async fn delete_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "DELETE FROM refresh_tokens WHERE token = $1 \
             RETURNING id, token, user_id, expires_at, created_at",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(record.map(RefreshTokenRecord::into_domain))
    }
}
