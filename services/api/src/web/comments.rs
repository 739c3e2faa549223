//! services/api/src/web/comments.rs
//!
//! Comment endpoints, all nested under a dream path. Threading rules live in
//! `dreamlog_core::comments`; these handlers only translate HTTP.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use dreamlog_core::comments;
use dreamlog_core::domain::{Comment, CommentPatch, NewComment};

use crate::error::{ApiError, ErrorBody};
use crate::web::rest::{base_url, Saved};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub author: Option<Uuid>,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(req: CreateCommentRequest) -> Self {
        Self {
            content: req.content,
            author: req.author,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CommentBody {
    pub id: Uuid,
    pub content: String,
    pub author: Uuid,
    pub dream: Uuid,
    pub parent: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentBody {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            author: comment.author,
            dream: comment.dream,
            parent: comment.parent,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CommentEnvelope {
    pub comment: CommentBody,
}

#[derive(Serialize, ToSchema)]
pub struct CommentsEnvelope {
    pub comments: Vec<CommentBody>,
}

fn comment_href(headers: &HeaderMap, dream_id: Uuid, comment_id: Uuid) -> String {
    format!(
        "{}/dreams/{dream_id}/comments/{comment_id}",
        base_url(headers)
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /dreams/{id}/comments - Comment on a dream
#[utoipa::path(
    post,
    path = "/dreams/{id}/comments",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Dream id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Dream not found", body = ErrorBody)
    )
)]
pub async fn create_comment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(dream_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = comments::create_top_level(state.store.as_ref(), dream_id, req.into()).await?;

    let href = comment_href(&headers, dream_id, comment.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(comment.id, "Gets the created comment", href)),
    ))
}

/// POST /dreams/{id}/comments/{comment_id} - Reply to a comment
#[utoipa::path(
    post,
    path = "/dreams/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Dream id"),
        ("comment_id" = Uuid, Path, description = "Parent comment id")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Reply created", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Dream or parent comment not found", body = ErrorBody)
    )
)]
pub async fn reply_comment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((dream_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply =
        comments::create_reply(state.store.as_ref(), dream_id, comment_id, req.into()).await?;

    let href = comment_href(&headers, dream_id, reply.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(reply.id, "Gets the created comment", href)),
    ))
}

/// GET /dreams/{id}/comments - List a dream's comments
///
/// The set is recomputed from the comments collection on every read and is
/// returned even when the dream itself has been deleted.
#[utoipa::path(
    get,
    path = "/dreams/{id}/comments",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Dream id")),
    responses(
        (status = 200, description = "The dream's comments in insertion order", body = CommentsEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_dream_comments_handler(
    State(state): State<Arc<AppState>>,
    Path(dream_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = comments::for_dream(state.store.as_ref(), dream_id).await?;
    Ok(Json(CommentsEnvelope {
        comments: comments.into_iter().map(CommentBody::from).collect(),
    }))
}

/// GET /dreams/{id}/comments/{comment_id} - Fetch one comment
///
/// The lookup is dream-scoped: a comment that exists under another dream
/// yields 404 here.
#[utoipa::path(
    get,
    path = "/dreams/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Dream id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "The comment", body = CommentEnvelope),
        (status = 404, description = "Dream or comment not found", body = ErrorBody)
    )
)]
pub async fn get_comment_handler(
    State(state): State<Arc<AppState>>,
    Path((dream_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = comments::find_in_dream(state.store.as_ref(), dream_id, comment_id).await?;
    Ok(Json(CommentEnvelope {
        comment: comment.into(),
    }))
}

/// PATCH /dreams/{id}/comments/{comment_id} - Edit a comment's content
#[utoipa::path(
    patch,
    path = "/dreams/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Dream id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Dream or comment not found", body = ErrorBody)
    )
)]
pub async fn update_comment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((dream_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = CommentPatch {
        content: req.content,
    };
    let comment =
        comments::update_content(state.store.as_ref(), dream_id, comment_id, patch).await?;

    let href = comment_href(&headers, dream_id, comment.id);
    Ok(Json(Saved::new(
        comment.id,
        "Gets the updated comment",
        href,
    )))
}

/// DELETE /dreams/{id}/comments/{comment_id} - Delete a comment
///
/// Deletion is by comment id alone; the dream id in the path is not
/// consulted. Replies pointing at the deleted comment are kept.
#[utoipa::path(
    delete,
    path = "/dreams/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Dream id (not checked)"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    )
)]
pub async fn delete_comment_handler(
    State(state): State<Arc<AppState>>,
    Path((_dream_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    comments::delete(state.store.as_ref(), comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
