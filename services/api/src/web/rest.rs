//! services/api/src/web/rest.rs
//!
//! Shared REST plumbing (hypermedia links, paging parameters) and the master
//! definition for the OpenAPI specification.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use super::{auth, comments, dream_types, dreams, reactions, topics, users};
use crate::error::{ErrorBody, ErrorEntry};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        users::create_user_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        dreams::create_dream_handler,
        dreams::list_dreams_handler,
        dreams::get_dream_handler,
        dreams::update_dream_handler,
        dreams::delete_dream_handler,
        comments::create_comment_handler,
        comments::reply_comment_handler,
        comments::list_dream_comments_handler,
        comments::get_comment_handler,
        comments::update_comment_handler,
        comments::delete_comment_handler,
        topics::create_topic_handler,
        topics::list_topics_handler,
        topics::get_topic_handler,
        topics::update_topic_handler,
        topics::delete_topic_handler,
        dream_types::create_type_handler,
        dream_types::list_types_handler,
        dream_types::get_type_handler,
        dream_types::update_type_handler,
        dream_types::delete_type_handler,
        reactions::create_reaction_handler,
        reactions::list_reactions_handler,
        reactions::update_reaction_handler,
        reactions::delete_reaction_handler,
    ),
    components(schemas(
        ErrorBody,
        ErrorEntry,
        Link,
        Saved,
        auth::LoginRequest,
        users::CreateUserRequest,
        users::UpdateUserRequest,
        users::UserBody,
        users::UserEnvelope,
        users::UsersEnvelope,
        dreams::CreateDreamRequest,
        dreams::UpdateDreamRequest,
        dreams::DreamBody,
        dreams::DreamEnvelope,
        dreams::DreamsEnvelope,
        comments::CreateCommentRequest,
        comments::UpdateCommentRequest,
        comments::CommentBody,
        comments::CommentEnvelope,
        comments::CommentsEnvelope,
        topics::SaveTopicRequest,
        topics::TopicBody,
        topics::TopicEnvelope,
        topics::TopicsEnvelope,
        dream_types::SaveTypeRequest,
        dream_types::TypeBody,
        dream_types::TypeEnvelope,
        dream_types::TypesEnvelope,
        reactions::CreateReactionRequest,
        reactions::UpdateReactionRequest,
        reactions::ReactionBody,
        reactions::ReactionsEnvelope,
    )),
    tags(
        (name = "auth", description = "Login, logout and session inspection."),
        (name = "users", description = "Account management."),
        (name = "dreams", description = "The dream journal itself."),
        (name = "comments", description = "Discussion threads under dreams."),
        (name = "topics", description = "Labels a dream can carry."),
        (name = "types", description = "The kind of dream (lucid, nightmare, ...)."),
        (name = "reactions", description = "Reactions users can leave on dreams.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Response and Query Structs
//=========================================================================================

/// A hypermedia link pointing back at a freshly written resource.
#[derive(Serialize, ToSchema)]
pub struct Link {
    pub rel: String,
    pub action: String,
    pub href: String,
}

/// The `{ id, links }` payload returned by every create and update endpoint.
#[derive(Serialize, ToSchema)]
pub struct Saved {
    pub id: Uuid,
    pub links: Vec<Link>,
}

impl Saved {
    pub fn new(id: Uuid, rel: impl Into<String>, href: String) -> Self {
        Self {
            id,
            links: vec![Link {
                rel: rel.into(),
                action: "GET".to_string(),
                href,
            }],
        }
    }
}

/// Paging query parameters shared by the list endpoints.
#[derive(Deserialize, IntoParams)]
pub struct ListParams {
    /// How many records to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl ListParams {
    /// The effective `(skip, limit)` pair. Negative query values are
    /// clamped to zero; Postgres rejects a negative OFFSET.
    pub fn page(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.max(0))
    }
}

fn default_limit() -> i64 {
    100
}

/// Builds the absolute base for link hrefs from the request's Host header.
pub fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}
