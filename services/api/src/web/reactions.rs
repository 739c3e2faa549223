//! services/api/src/web/reactions.rs
//!
//! Reaction endpoints. Reactions are reference data (a name and an icon);
//! nothing links them to dreams yet. There is no single-reaction read,
//! and updates are partial.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use dreamlog_core::domain::{NewReaction, Reaction, ReactionPatch};
use dreamlog_core::error::{Entity, Error as CoreError};
use dreamlog_core::validate;

use crate::error::{ApiError, ErrorBody};
use crate::web::rest::{base_url, ListParams, Saved};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateReactionRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl From<CreateReactionRequest> for NewReaction {
    fn from(req: CreateReactionRequest) -> Self {
        Self {
            name: req.name,
            icon: req.icon,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateReactionRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl From<UpdateReactionRequest> for ReactionPatch {
    fn from(req: UpdateReactionRequest) -> Self {
        Self {
            name: req.name,
            icon: req.icon,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReactionBody {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reaction> for ReactionBody {
    fn from(reaction: Reaction) -> Self {
        Self {
            id: reaction.id,
            name: reaction.name,
            icon: reaction.icon,
            created_at: reaction.created_at,
            updated_at: reaction.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReactionsEnvelope {
    pub reactions: Vec<ReactionBody>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /reactions - Create a reaction
#[utoipa::path(
    post,
    path = "/reactions",
    tag = "reactions",
    request_body = CreateReactionRequest,
    responses(
        (status = 201, description = "Reaction created", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody)
    )
)]
pub async fn create_reaction_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate::new_reaction(req.into())?;
    let reaction = state.store.create_reaction(draft).await?;

    let href = format!("{}/reactions/{}", base_url(&headers), reaction.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(reaction.id, "Gets the created reaction", href)),
    ))
}

/// GET /reactions - List reactions
#[utoipa::path(
    get,
    path = "/reactions",
    tag = "reactions",
    params(ListParams),
    responses(
        (status = 200, description = "A page of reactions", body = ReactionsEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_reactions_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (skip, limit) = params.page();
    let reactions = state.store.find_reactions(skip, limit).await?;
    Ok(Json(ReactionsEnvelope {
        reactions: reactions.into_iter().map(ReactionBody::from).collect(),
    }))
}

/// PATCH /reactions/{id} - Update a reaction
#[utoipa::path(
    patch,
    path = "/reactions/{id}",
    tag = "reactions",
    params(("id" = Uuid, Path, description = "Reaction id")),
    request_body = UpdateReactionRequest,
    responses(
        (status = 200, description = "Reaction updated", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Reaction not found", body = ErrorBody)
    )
)]
pub async fn update_reaction_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut reaction = state
        .store
        .find_reaction(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Reaction))?;

    let patch = ReactionPatch::from(req);
    validate::reaction_patch(&patch)?;
    if let Some(name) = patch.name {
        reaction.name = name;
    }
    if let Some(icon) = patch.icon {
        reaction.icon = icon;
    }
    let reaction = state.store.save_reaction(reaction).await?;

    let href = format!("{}/reactions/{}", base_url(&headers), reaction.id);
    Ok(Json(Saved::new(
        reaction.id,
        "Gets the updated reaction",
        href,
    )))
}

/// DELETE /reactions/{id} - Delete a reaction
#[utoipa::path(
    delete,
    path = "/reactions/{id}",
    tag = "reactions",
    params(("id" = Uuid, Path, description = "Reaction id")),
    responses(
        (status = 204, description = "Reaction deleted"),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Reaction not found", body = ErrorBody)
    )
)]
pub async fn delete_reaction_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .delete_reaction(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Reaction))?;
    Ok(StatusCode::NO_CONTENT)
}
