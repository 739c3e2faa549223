//! services/api/src/web/topics.rs
//!
//! Topic endpoints. Updates use PUT: both fields are validated and replaced
//! wholesale, while id and creation time stay put.

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

use dreamlog_core::domain::{NewTopic, Topic};
use dreamlog_core::error::{Entity, Error as CoreError};
use dreamlog_core::validate;

use crate::error::{ApiError, ErrorBody};
use crate::web::rest::{base_url, ListParams, Saved};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SaveTopicRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl From<SaveTopicRequest> for NewTopic {
    fn from(req: SaveTopicRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TopicBody {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Topic> for TopicBody {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name,
            color: topic.color,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TopicEnvelope {
    pub topic: TopicBody,
}

#[derive(Serialize, ToSchema)]
pub struct TopicsEnvelope {
    pub topics: Vec<TopicBody>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /topics - Create a topic
#[utoipa::path(
    post,
    path = "/topics",
    tag = "topics",
    request_body = SaveTopicRequest,
    responses(
        (status = 201, description = "Topic created", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody)
    )
)]
pub async fn create_topic_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SaveTopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate::new_topic(req.into())?;
    let topic = state.store.create_topic(draft).await?;

    let href = format!("{}/topics/{}", base_url(&headers), topic.id);
    Ok((
        StatusCode::CREATED,
        Json(Saved::new(topic.id, "Gets the created topic", href)),
    ))
}

/// GET /topics - List topics
#[utoipa::path(
    get,
    path = "/topics",
    tag = "topics",
    params(ListParams),
    responses(
        (status = 200, description = "A page of topics", body = TopicsEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_topics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (skip, limit) = params.page();
    let topics = state.store.find_topics(skip, limit).await?;
    Ok(Json(TopicsEnvelope {
        topics: topics.into_iter().map(TopicBody::from).collect(),
    }))
}

/// GET /topics/{id} - Fetch one topic
#[utoipa::path(
    get,
    path = "/topics/{id}",
    tag = "topics",
    params(("id" = Uuid, Path, description = "Topic id")),
    responses(
        (status = 200, description = "The topic", body = TopicEnvelope),
        (status = 404, description = "Topic not found", body = ErrorBody)
    )
)]
pub async fn get_topic_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let topic = state
        .store
        .find_topic(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Topic))?;
    Ok(Json(TopicEnvelope {
        topic: topic.into(),
    }))
}

/// PUT /topics/{id} - Replace a topic
#[utoipa::path(
    put,
    path = "/topics/{id}",
    tag = "topics",
    params(("id" = Uuid, Path, description = "Topic id")),
    request_body = SaveTopicRequest,
    responses(
        (status = 200, description = "Topic replaced", body = Saved),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Topic not found", body = ErrorBody)
    )
)]
pub async fn update_topic_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveTopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut topic = state
        .store
        .find_topic(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Topic))?;

    let draft = validate::new_topic(req.into())?;
    topic.name = draft.name;
    topic.color = draft.color;
    let topic = state.store.save_topic(topic).await?;

    let href = format!("{}/topics/{}", base_url(&headers), topic.id);
    Ok(Json(Saved::new(topic.id, "Gets the updated topic", href)))
}

/// DELETE /topics/{id} - Delete a topic
///
/// Dreams already tagged with the topic keep the dangling reference.
#[utoipa::path(
    delete,
    path = "/topics/{id}",
    tag = "topics",
    params(("id" = Uuid, Path, description = "Topic id")),
    responses(
        (status = 204, description = "Topic deleted"),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "Topic not found", body = ErrorBody)
    )
)]
pub async fn delete_topic_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .delete_topic(id)
        .await?
        .ok_or(CoreError::NotFound(Entity::Topic))?;
    Ok(StatusCode::NO_CONTENT)
}
