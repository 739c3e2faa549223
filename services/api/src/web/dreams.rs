//! services/api/src/web/dreams.rs
//!
//! Dream endpoints. Shape of the payloads mirrors the journal's document
//! model; the `type` field maps to `kind` internally because `type` is a
//! keyword.

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

use dreamlog_core::domain::{Dream, DreamPatch, NewDream};
use dreamlog_core::error::{Entity, Error as CoreError};
use dreamlog_core::validate;

use crate::error::{ApiError, ErrorBody};
use crate::web::rest::{base_url, ListParams, Saved};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateDreamRequest {
    pub content: Option<String>,
    pub title: Option<String>,
    pub topics: Option<Vec<Uuid>>,
    #[serde(rename = "type")]
    pub kind: Option<Uuid>,
    pub anonym: Option<bool>,
    pub published: Option<bool>,
    pub author: Option<Uuid>,
}

impl From<CreateDreamRequest> for NewDream {
    fn from(req: CreateDreamRequest) -> Self {
        Self {
            author: req.author,
            anonym: req.anonym,
            content: req.content,
            title: req.title,
            topics: req.topics,
            kind: req.kind,
            published: req.published,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateDreamRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub topics: Option<Vec<Uuid>>,
    #[serde(rename = "type")]
    pub kind: Option<Uuid>,
    pub anonym: Option<bool>,
}

impl From<UpdateDreamRequest> for DreamPatch {
    fn from(req: UpdateDreamRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            topics: req.topics,
            kind: req.kind,
            anonym: req.anonym,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DreamBody {
    pub id: Uuid,
    pub author: Uuid,
    pub anonym: bool,
    pub content: String,
    pub title: String,
    pub topics: Vec<Uuid>,
    #[serde(rename = "type")]
    pub kind: Uuid,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Dream> for DreamBody {
    fn from(dream: Dream) -> Self {
        Self {
            id: dream.id,
            author: dream.author,
            anonym: dream.anonym,
            content: dream.content,
            title: dream.title,
            topics: dream.topics,
            kind: dream.kind,
            published: dream.published,
            created_at: dream.created_at,
            updated_at: dream.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DreamEnvelope {
    pub dream: DreamBody,
}

#[derive(Serialize, ToSchema)]
pub struct DreamsEnvelope {
    pub dreams: Vec<DreamBody>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /dreams - Record a new dream
#[utoipa::path(
    post,
    path = "/dreams",
    tag = "dreams",
    request_body = CreateDreamRequest,
    responses(
        (status = 201, description = "Dream recorded", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_dream_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateDreamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate::dream_draft(state.store.as_ref(), req.into()).await?;
    let dream = state.store.create_dream(draft).await?;

    let href = format!("{}/dreams/{}", base_url(&headers), dream.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(dream.id, "Gets the created dream", href)),
    ))
}

/// GET /dreams - List dreams
#[utoipa::path(
    get,
    path = "/dreams",
    tag = "dreams",
    params(ListParams),
    responses(
        (status = 200, description = "A page of dreams", body = DreamsEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_dreams_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (skip, limit) = params.page();
    let dreams = state.store.find_dreams(skip, limit).await?;
    Ok(Json(DreamsEnvelope {
        dreams: dreams.into_iter().map(DreamBody::from).collect(),
    }))
}

/// GET /dreams/{id} - Fetch one dream
#[utoipa::path(
    get,
    path = "/dreams/{id}",
    tag = "dreams",
    params(("id" = Uuid, Path, description = "Dream id")),
    responses(
        (status = 200, description = "The dream", body = DreamEnvelope),
        (status = 404, description = "Dream not found", body = ErrorBody)
    )
)]
pub async fn get_dream_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let dream = state
        .store
        .find_dream(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Dream))?;
    Ok(Json(DreamEnvelope {
        dream: dream.into(),
    }))
}

/// PATCH /dreams/{id} - Update a dream
///
/// Absent (or null) fields are left untouched; a failed validation leaves
/// the stored dream exactly as it was.
#[utoipa::path(
    patch,
    path = "/dreams/{id}",
    tag = "dreams",
    params(("id" = Uuid, Path, description = "Dream id")),
    request_body = UpdateDreamRequest,
    responses(
        (status = 200, description = "Dream updated", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Dream not found", body = ErrorBody)
    )
)]
pub async fn update_dream_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDreamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut dream = state
        .store
        .find_dream(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Dream))?;

    validate::apply_dream_patch(state.store.as_ref(), &mut dream, req.into()).await?;
    let dream = state.store.save_dream(dream).await?;

    let href = format!("{}/dreams/{}", base_url(&headers), dream.id);
    Ok(Json(Saved::new(dream.id, "Gets the updated dream", href)))
}

/// DELETE /dreams/{id} - Delete a dream
///
/// Comments written under the dream are left in place.
#[utoipa::path(
    delete,
    path = "/dreams/{id}",
    tag = "dreams",
    params(("id" = Uuid, Path, description = "Dream id")),
    responses(
        (status = 204, description = "Dream deleted"),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Dream not found", body = ErrorBody)
    )
)]
pub async fn delete_dream_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .delete_dream(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Dream))?;
    Ok(StatusCode::NO_CONTENT)
}
