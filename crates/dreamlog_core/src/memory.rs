//! crates/dreamlog_core/src/memory.rs
//!
//! An in-memory [`JournalStore`] holding each collection as a `Vec` in
//! insertion order. Backs the unit and integration tests; nothing here
//! enforces references or uniqueness, exactly like the real adapter.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentDraft, Dream, DreamDraft, DreamType, DreamTypeDraft, Reaction, ReactionDraft,
    RefreshToken, RefreshTokenDraft, Topic, TopicDraft, User, UserCredentials, UserDraft,
};
use crate::ports::{JournalStore, StoreError, StoreResult};

// The password hash is kept next to the user, never inside it, mirroring a
// select-excluded column.
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct Collections {
    users: Vec<StoredUser>,
    dreams: Vec<Dream>,
    comments: Vec<Comment>,
    topics: Vec<Topic>,
    dream_types: Vec<DreamType>,
    reactions: Vec<Reaction>,
    refresh_tokens: Vec<RefreshToken>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

fn page<T: Clone>(items: &[T], skip: i64, limit: i64) -> Vec<T> {
    items
        .iter()
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait::async_trait]
impl JournalStore for MemoryStore {
    // --- Users ---
    async fn create_user(&self, draft: UserDraft) -> StoreResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            description: draft.description,
            avatar: draft.avatar,
            last_connection: now,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.users.push(StoredUser {
            user: user.clone(),
            password_hash: draft.password_hash,
        });
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|s| s.user.id == id)
            .map(|s| s.user.clone()))
    }

    async fn find_users(&self, skip: i64, limit: i64) -> StoreResult<Vec<User>> {
        let inner = self.lock()?;
        let users: Vec<User> = inner.users.iter().map(|s| s.user.clone()).collect();
        Ok(page(&users, skip, limit))
    }

    async fn save_user(&self, user: User) -> StoreResult<User> {
        let mut inner = self.lock()?;
        match inner.users.iter_mut().find(|s| s.user.id == user.id) {
            Some(stored) => {
                stored.user = User {
                    updated_at: Utc::now(),
                    ..user
                };
                Ok(stored.user.clone())
            }
            // The document disappeared under us; accepted race, no write.
            None => Ok(user),
        }
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let mut inner = self.lock()?;
        let position = inner.users.iter().position(|s| s.user.id == id);
        Ok(position.map(|i| inner.users.remove(i).user))
    }

    async fn user_name_taken(&self, name: &str, exclude: Option<Uuid>) -> StoreResult<bool> {
        Ok(self
            .lock()?
            .users
            .iter()
            .any(|s| s.user.name == name && exclude != Some(s.user.id)))
    }

    async fn find_credentials_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        Ok(self.lock()?.users.iter().find(|s| s.user.name == name).map(|s| {
            UserCredentials {
                id: s.user.id,
                name: s.user.name.clone(),
                password_hash: s.password_hash.clone(),
            }
        }))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut inner = self.lock()?;
        if let Some(stored) = inner.users.iter_mut().find(|s| s.user.id == id) {
            stored.password_hash = password_hash.to_string();
            stored.user.updated_at = Utc::now();
        }
        Ok(())
    }

    // --- Dreams ---
    async fn create_dream(&self, draft: DreamDraft) -> StoreResult<Dream> {
        let now = Utc::now();
        let dream = Dream {
            id: Uuid::new_v4(),
            author: draft.author,
            anonym: draft.anonym,
            content: draft.content,
            title: draft.title,
            topics: draft.topics,
            kind: draft.kind,
            published: draft.published,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.dreams.push(dream.clone());
        Ok(dream)
    }

    async fn find_dream(&self, id: Uuid) -> StoreResult<Option<Dream>> {
        Ok(self.lock()?.dreams.iter().find(|d| d.id == id).cloned())
    }

    async fn find_dreams(&self, skip: i64, limit: i64) -> StoreResult<Vec<Dream>> {
        Ok(page(&self.lock()?.dreams, skip, limit))
    }

    async fn find_dreams_by_author(&self, author: Uuid) -> StoreResult<Vec<Dream>> {
        Ok(self
            .lock()?
            .dreams
            .iter()
            .filter(|d| d.author == author)
            .cloned()
            .collect())
    }

    async fn save_dream(&self, dream: Dream) -> StoreResult<Dream> {
        let mut inner = self.lock()?;
        match inner.dreams.iter_mut().find(|d| d.id == dream.id) {
            Some(stored) => {
                *stored = Dream {
                    updated_at: Utc::now(),
                    ..dream
                };
                Ok(stored.clone())
            }
            None => Ok(dream),
        }
    }

    async fn delete_dream(&self, id: Uuid) -> StoreResult<Option<Dream>> {
        let mut inner = self.lock()?;
        let position = inner.dreams.iter().position(|d| d.id == id);
        Ok(position.map(|i| inner.dreams.remove(i)))
    }

    // --- Comments ---
    async fn create_comment(&self, draft: CommentDraft) -> StoreResult<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content: draft.content,
            author: draft.author,
            dream: draft.dream,
            parent: draft.parent,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.lock()?.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_comments_by_dream(&self, dream: Uuid) -> StoreResult<Vec<Comment>> {
        Ok(self
            .lock()?
            .comments
            .iter()
            .filter(|c| c.dream == dream)
            .cloned()
            .collect())
    }

    async fn save_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let mut inner = self.lock()?;
        match inner.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(stored) => {
                *stored = Comment {
                    updated_at: Utc::now(),
                    ..comment
                };
                Ok(stored.clone())
            }
            None => Ok(comment),
        }
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let mut inner = self.lock()?;
        let position = inner.comments.iter().position(|c| c.id == id);
        Ok(position.map(|i| inner.comments.remove(i)))
    }

    // --- Topics ---
    async fn create_topic(&self, draft: TopicDraft) -> StoreResult<Topic> {
        let now = Utc::now();
        let topic = Topic {
            id: Uuid::new_v4(),
            name: draft.name,
            color: draft.color,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.topics.push(topic.clone());
        Ok(topic)
    }

    async fn find_topic(&self, id: Uuid) -> StoreResult<Option<Topic>> {
        Ok(self.lock()?.topics.iter().find(|t| t.id == id).cloned())
    }

    async fn find_topics(&self, skip: i64, limit: i64) -> StoreResult<Vec<Topic>> {
        Ok(page(&self.lock()?.topics, skip, limit))
    }

    async fn save_topic(&self, topic: Topic) -> StoreResult<Topic> {
        let mut inner = self.lock()?;
        match inner.topics.iter_mut().find(|t| t.id == topic.id) {
            Some(stored) => {
                *stored = Topic {
                    updated_at: Utc::now(),
                    ..topic
                };
                Ok(stored.clone())
            }
            None => Ok(topic),
        }
    }

    async fn delete_topic(&self, id: Uuid) -> StoreResult<Option<Topic>> {
        let mut inner = self.lock()?;
        let position = inner.topics.iter().position(|t| t.id == id);
        Ok(position.map(|i| inner.topics.remove(i)))
    }

    async fn topic_exists(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.lock()?.topics.iter().any(|t| t.id == id))
    }

    // --- Dream Types ---
    async fn create_dream_type(&self, draft: DreamTypeDraft) -> StoreResult<DreamType> {
        let now = Utc::now();
        let dream_type = DreamType {
            id: Uuid::new_v4(),
            name: draft.name,
            color: draft.color,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.dream_types.push(dream_type.clone());
        Ok(dream_type)
    }

    async fn find_dream_type(&self, id: Uuid) -> StoreResult<Option<DreamType>> {
        Ok(self.lock()?.dream_types.iter().find(|t| t.id == id).cloned())
    }

    async fn find_dream_types(&self, skip: i64, limit: i64) -> StoreResult<Vec<DreamType>> {
        Ok(page(&self.lock()?.dream_types, skip, limit))
    }

    async fn save_dream_type(&self, dream_type: DreamType) -> StoreResult<DreamType> {
        let mut inner = self.lock()?;
        match inner.dream_types.iter_mut().find(|t| t.id == dream_type.id) {
            Some(stored) => {
                *stored = DreamType {
                    updated_at: Utc::now(),
                    ..dream_type
                };
                Ok(stored.clone())
            }
            None => Ok(dream_type),
        }
    }

    async fn delete_dream_type(&self, id: Uuid) -> StoreResult<Option<DreamType>> {
        let mut inner = self.lock()?;
        let position = inner.dream_types.iter().position(|t| t.id == id);
        Ok(position.map(|i| inner.dream_types.remove(i)))
    }

    // --- Reactions ---
    async fn create_reaction(&self, draft: ReactionDraft) -> StoreResult<Reaction> {
        let now = Utc::now();
        let reaction = Reaction {
            id: Uuid::new_v4(),
            name: draft.name,
            icon: draft.icon,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.reactions.push(reaction.clone());
        Ok(reaction)
    }

    async fn find_reaction(&self, id: Uuid) -> StoreResult<Option<Reaction>> {
        Ok(self.lock()?.reactions.iter().find(|r| r.id == id).cloned())
    }

    async fn find_reactions(&self, skip: i64, limit: i64) -> StoreResult<Vec<Reaction>> {
        Ok(page(&self.lock()?.reactions, skip, limit))
    }

    async fn save_reaction(&self, reaction: Reaction) -> StoreResult<Reaction> {
        let mut inner = self.lock()?;
        match inner.reactions.iter_mut().find(|r| r.id == reaction.id) {
            Some(stored) => {
                *stored = Reaction {
                    updated_at: Utc::now(),
                    ..reaction
                };
                Ok(stored.clone())
            }
            None => Ok(reaction),
        }
    }

    async fn delete_reaction(&self, id: Uuid) -> StoreResult<Option<Reaction>> {
        let mut inner = self.lock()?;
        let position = inner.reactions.iter().position(|r| r.id == id);
        Ok(position.map(|i| inner.reactions.remove(i)))
    }

    // --- Refresh Tokens ---
    async fn create_refresh_token(&self, draft: RefreshTokenDraft) -> StoreResult<RefreshToken> {
        let token = RefreshToken {
            id: Uuid::new_v4(),
            token: draft.token,
            user: draft.user,
            expires_at: draft.expires_at,
            created_at: Utc::now(),
        };
        self.lock()?.refresh_tokens.push(token.clone());
        Ok(token)
    }

    async fn find_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        Ok(self
            .lock()?
            .refresh_tokens
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn delete_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        let mut inner = self.lock()?;
        let position = inner.refresh_tokens.iter().position(|t| t.token == token);
        Ok(position.map(|i| inner.refresh_tokens.remove(i)))
    }
}
