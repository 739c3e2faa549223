//! services/api/src/web/dream_types.rs
//!
//! Dream-type endpoints (`/types`). Same shape and rules as topics; kept as
//! its own collection because dreams reference exactly one type but many
//! topics.

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

use dreamlog_core::domain::{DreamType, NewDreamType};
use dreamlog_core::error::{Entity, Error as CoreError};
use dreamlog_core::validate;

use crate::error::{ApiError, ErrorBody};
use crate::web::rest::{base_url, ListParams, Saved};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SaveTypeRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl From<SaveTypeRequest> for NewDreamType {
    fn from(req: SaveTypeRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TypeBody {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DreamType> for TypeBody {
    fn from(dream_type: DreamType) -> Self {
        Self {
            id: dream_type.id,
            name: dream_type.name,
            color: dream_type.color,
            created_at: dream_type.created_at,
            updated_at: dream_type.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TypeEnvelope {
    #[serde(rename = "type")]
    pub kind: TypeBody,
}

#[derive(Serialize, ToSchema)]
pub struct TypesEnvelope {
    pub types: Vec<TypeBody>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /types - Create a dream type
#[utoipa::path(
    post,
    path = "/types",
    tag = "types",
    request_body = SaveTypeRequest,
    responses(
        (status = 201, description = "Type created", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody)
    )
)]
pub async fn create_type_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SaveTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate::new_dream_type(req.into())?;
    let dream_type = state.store.create_dream_type(draft).await?;

    let href = format!("{}/types/{}", base_url(&headers), dream_type.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(dream_type.id, "Gets the created type", href)),
    ))
}

/// GET /types - List dream types
#[utoipa::path(
    get,
    path = "/types",
    tag = "types",
    params(ListParams),
    responses(
        (status = 200, description = "A page of types", body = TypesEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_types_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (skip, limit) = params.page();
    let types = state.store.find_dream_types(skip, limit).await?;
    Ok(Json(TypesEnvelope {
        types: types.into_iter().map(TypeBody::from).collect(),
    }))
}

/// GET /types/{id} - Fetch one dream type
#[utoipa::path(
    get,
    path = "/types/{id}",
    tag = "types",
    params(("id" = Uuid, Path, description = "Type id")),
    responses(
        (status = 200, description = "The type", body = TypeEnvelope),
        (status = 404, description = "Type not found", body = ErrorBody)
    )
)]
pub async fn get_type_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let dream_type = state
        .store
        .find_dream_type(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::DreamType))?;
    Ok(Json(TypeEnvelope {
        kind: dream_type.into(),
    }))
}

/// PUT /types/{id} - Replace a dream type
#[utoipa::path(
    put,
    path = "/types/{id}",
    tag = "types",
    params(("id" = Uuid, Path, description = "Type id")),
    request_body = SaveTypeRequest,
    responses(
        (status = 200, description = "Type replaced", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Type not found", body = ErrorBody)
    )
)]
pub async fn update_type_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut dream_type = state
        .store
        .find_dream_type(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::DreamType))?;

    let draft = validate::new_dream_type(req.into())?;
    dream_type.name = draft.name;
    dream_type.color = draft.color;
    let dream_type = state.store.save_dream_type(dream_type).await?;

    let href = format!("{}/types/{}", base_url(&headers), dream_type.id);
    Ok(Json(Saved::new(
        dream_type.id,
        "Gets the updated type",
        href,
    )))
}

/// DELETE /types/{id} - Delete a dream type
///
/// Dreams of this type keep the dangling reference.
#[utoipa::path(
    delete,
    path = "/types/{id}",
    tag = "types",
    params(("id" = Uuid, Path, description = "Type id")),
    responses(
        (status = 204, description = "Type deleted"),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Type not found", body = ErrorBody)
    )
)]
pub async fn delete_type_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .delete_dream_type(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::DreamType))?;
    Ok(StatusCode::NO_CONTENT)
}
