//! services/api/src/web/users.rs
//!
//! Account endpoints. Signup is `POST /users` and is the only write that does
//! not require a session; everything a user owns hangs off these documents.

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

use dreamlog_core::domain::{NewUser, User, UserDraft, UserPatch};
use dreamlog_core::error::{Entity, Error as CoreError};
use dreamlog_core::validate;

use crate::error::{ApiError, ErrorBody};
use crate::web::auth::hash_password;
use crate::web::dreams::DreamBody;
use crate::web::rest::{base_url, ListParams, Saved};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            description: req.description,
            avatar: req.avatar,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            description: req.description,
            avatar: req.avatar,
        }
    }
}

/// A user as returned over the wire. The password hash never leaves the
/// store; `dreams` is only populated on the single-user endpoint.
#[derive(Serialize, ToSchema)]
pub struct UserBody {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub last_connection: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dreams: Option<Vec<DreamBody>>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            description: user.description,
            avatar: user.avatar,
            last_connection: user.last_connection,
            created_at: user.created_at,
            updated_at: user.updated_at,
            dreams: None,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserBody,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UsersEnvelope {
    pub users: Vec<UserBody>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /users - Create a new account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attrs = NewUser::from(req);
    validate::new_user(state.store.as_ref(), &attrs).await?;

    // Validation guarantees name and password are present and non-empty.
    let password_hash = hash_password(&attrs.password.unwrap_or_default())?;
    let user = state
        .store
        .create_user(UserDraft {
            name: attrs.name.unwrap_or_default(),
            email: attrs.email,
            password_hash,
            description: attrs.description,
            avatar: attrs.avatar,
        })
        .await?;

    let href = format!("{}/users/{}", base_url(&headers), user.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(user.id, "Gets the created user", href)),
    ))
}

/// GET /users - List accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListParams),
    responses(
        (status = 200, description = "A page of users", body = UsersEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (skip, limit) = params.page();
    let users = state.store.find_users(skip, limit).await?;
    Ok(Json(UsersEnvelope {
        users: users.into_iter().map(UserBody::from).collect(),
    }))
}

/// GET /users/{id} - Fetch one account with its dreams
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The user, dreams included", body = UserEnvelope),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::User))?;
    let dreams = state.store.find_dreams_by_author(id).await?;

    let mut body = UserBody::from(user);
    body.dreams = Some(dreams.into_iter().map(DreamBody::from).collect());
    Ok(Json(UserEnvelope { user: body }))
}

/// PATCH /users/{id} - Update an account
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut user = state
        .store
        .find_user(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::User))?;

    let patch = UserPatch::from(req);
    validate::user_patch(state.store.as_ref(), &user, &patch).await?;

    if let Some(password) = &patch.password {
        let password_hash = hash_password(password)?;
        state.store.set_password_hash(id, &password_hash).await?;
    }
    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(email) = patch.email {
        user.email = Some(email);
    }
    if let Some(description) = patch.description {
        user.description = Some(description);
    }
    if let Some(avatar) = patch.avatar {
        user.avatar = Some(avatar);
    }
    let user = state.store.save_user(user).await?;

    let href = format!("{}/users/{}", base_url(&headers), user.id);
    Ok(Json(Saved::new(user.id, "Gets the updated user", href)))
}

/// DELETE /users/{id} - Delete an account
///
/// Dreams and comments written by the account are left in place.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .delete_user(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::User))?;
    Ok(StatusCode::NO_CONTENT)
}
