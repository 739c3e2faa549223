//! services/api/tests/api.rs
//!
//! End-to-end tests driving the full router over an in-memory store. Each
//! test builds a fresh app, so accounts and fixtures never leak between
//! tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use api_lib::config::Config;
use api_lib::web::{self, state::AppState};
use dreamlog_core::MemoryStore;

//=========================================================================================
// Harness
//=========================================================================================

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        log_level: tracing::Level::INFO,
        allowed_origin: axum::http::HeaderValue::from_static("http://localhost:3000"),
        refresh_token_ttl_days: 30,
    }
}

fn test_app() -> Router {
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config: Arc::new(test_config()),
    };
    web::app(Arc::new(state))
}

fn request(
    method: Method,
    path: &str,
    cookie: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn id_of(body: &Value) -> Uuid {
    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

//=========================================================================================
// Fixtures
//=========================================================================================

const PASSWORD: &str = "somnambulist";

async fn create_account(app: &Router, name: &str) -> Uuid {
    let (status, body) = call(
        app,
        request(
            Method::POST,
            "/users",
            None,
            Some(&json!({ "name": name, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    id_of(&body)
}

async fn login(app: &Router, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/auth/login",
            None,
            Some(&json!({ "name": name, "password": PASSWORD })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn seed_session(app: &Router) -> (String, Uuid) {
    let author = create_account(app, "rosalind").await;
    let cookie = login(app, "rosalind").await;
    (cookie, author)
}

/// Creates one topic and one type, returning their ids.
async fn seed_catalog(app: &Router, cookie: &str) -> (Uuid, Uuid) {
    let (status, body) = call(
        app,
        request(
            Method::POST,
            "/topics",
            Some(cookie),
            Some(&json!({ "name": "flying", "color": "#aa00ff" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let topic = id_of(&body);

    let (status, body) = call(
        app,
        request(
            Method::POST,
            "/types",
            Some(cookie),
            Some(&json!({ "name": "lucid", "color": "#0f0" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (topic, id_of(&body))
}

async fn seed_dream(app: &Router, cookie: &str, author: Uuid, topic: Uuid, kind: Uuid) -> Uuid {
    let (status, body) = call(
        app,
        request(
            Method::POST,
            "/dreams",
            Some(cookie),
            Some(&json!({
                "title": "Falling upward",
                "content": "I was climbing a staircase that kept unfolding.",
                "topics": [topic],
                "type": kind,
                "author": author,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    id_of(&body)
}

//=========================================================================================
// The Full Journey
//=========================================================================================

#[tokio::test]
async fn signup_login_and_thread_a_discussion() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;
    let dream = seed_dream(&app, &cookie, author, topic, kind).await;

    // Top-level comment, then a reply to it.
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{dream}/comments"),
            Some(&cookie),
            Some(&json!({ "content": "I have this one too.", "author": author })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first = id_of(&body);
    assert_eq!(body["links"][0]["action"], "GET");

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{dream}/comments/{first}"),
            Some(&cookie),
            Some(&json!({ "content": "Same staircase?", "author": author })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reply = id_of(&body);

    // The composed set comes back in insertion order with threading intact.
    let (status, body) = call(
        &app,
        request(Method::GET, &format!("/dreams/{dream}/comments"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(id_of(&comments[0]), first);
    assert_eq!(id_of(&comments[1]), reply);
    assert!(comments[0]["parent"].is_null());
    assert_eq!(comments[1]["parent"], json!(first));

    // Single-comment read inside the dream's scope.
    let (status, body) = call(
        &app,
        request(
            Method::GET,
            &format!("/dreams/{dream}/comments/{reply}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment"]["content"], "Same staircase?");
    assert_eq!(body["comment"]["dream"], json!(dream));
}

//=========================================================================================
// Dream Validation
//=========================================================================================

#[tokio::test]
async fn dream_with_unknown_topic_is_rejected_and_not_persisted() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (_, kind) = seed_catalog(&app, &cookie).await;
    let ghost = Uuid::new_v4();

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/dreams",
            Some(&cookie),
            Some(&json!({
                "title": "Ghost topic",
                "content": "Tagged with something that does not exist.",
                "topics": [ghost],
                "type": kind,
                "author": author,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["error"], "invalid_topic");
    assert_eq!(errors[0]["field"], "topics");
    assert_eq!(
        errors[0]["error_description"],
        format!("Topic {ghost} does not exist")
    );

    // Nothing was written.
    let (_, body) = call(&app, request(Method::GET, "/dreams", None, None)).await;
    assert_eq!(body["dreams"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_dream_enumerates_every_violation_in_schema_order() {
    let app = test_app();
    let (cookie, _) = seed_session(&app).await;

    let (status, body) = call(
        &app,
        request(Method::POST, "/dreams", Some(&cookie), Some(&json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["author", "content", "topics", "type", "title"]);
    assert_eq!(errors[0]["error"], "required");
    assert_eq!(errors[2]["error"], "topic_required");
    assert_eq!(
        errors[2]["error_description"],
        "At least one topic is required"
    );
}

#[tokio::test]
async fn dream_patch_failure_leaves_the_stored_dream_untouched() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;
    let dream = seed_dream(&app, &cookie, author, topic, kind).await;

    let (status, _) = call(
        &app,
        request(
            Method::PATCH,
            &format!("/dreams/{dream}"),
            Some(&cookie),
            Some(&json!({ "title": "New title", "topics": [Uuid::new_v4()] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(
        &app,
        request(Method::GET, &format!("/dreams/{dream}"), None, None),
    )
    .await;
    assert_eq!(body["dream"]["title"], "Falling upward");
    assert_eq!(body["dream"]["topics"], json!([topic]));
}

//=========================================================================================
// Not-Found Taxonomy
//=========================================================================================

#[tokio::test]
async fn missing_dream_and_missing_parent_name_the_entity() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;

    // Commenting on a dream that does not exist: Dream not found.
    let ghost_dream = Uuid::new_v4();
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{ghost_dream}/comments"),
            Some(&cookie),
            Some(&json!({ "content": "hello?", "author": author })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["error"], "not_found");
    assert_eq!(body["errors"][0]["error_description"], "Dream not found");

    // Replying under a real dream to a parent that does not exist.
    let dream = seed_dream(&app, &cookie, author, topic, kind).await;
    let ghost_parent = Uuid::new_v4();
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{dream}/comments/{ghost_parent}"),
            Some(&cookie),
            Some(&json!({ "content": "orphan reply", "author": author })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"][0]["error_description"],
        "Parent comment not found"
    );

    // The unknown-dream check fires before the parent check.
    let (status, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{ghost_dream}/comments/{ghost_parent}"),
            Some(&cookie),
            Some(&json!({ "content": "doubly lost", "author": author })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["error_description"], "Dream not found");

    // None of the failed attempts persisted anything.
    let (_, body) = call(
        &app,
        request(Method::GET, &format!("/dreams/{dream}/comments"), None, None),
    )
    .await;
    assert_eq!(body["comments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn comment_lookup_is_dream_scoped_not_global() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;
    let dream_a = seed_dream(&app, &cookie, author, topic, kind).await;
    let dream_b = seed_dream(&app, &cookie, author, topic, kind).await;

    let (_, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{dream_a}/comments"),
            Some(&cookie),
            Some(&json!({ "content": "belongs to A", "author": author })),
        ),
    )
    .await;
    let comment = id_of(&body);

    // The comment exists, but not under dream B.
    let (status, body) = call(
        &app,
        request(
            Method::GET,
            &format!("/dreams/{dream_b}/comments/{comment}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["error_description"], "Comment not found");

    // Under its own dream it resolves.
    let (status, _) = call(
        &app,
        request(
            Method::GET,
            &format!("/dreams/{dream_a}/comments/{comment}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

//=========================================================================================
// Orphaning (No Cascades)
//=========================================================================================

#[tokio::test]
async fn deleting_a_dream_leaves_its_comments_readable() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;
    let dream = seed_dream(&app, &cookie, author, topic, kind).await;

    let (_, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{dream}/comments"),
            Some(&cookie),
            Some(&json!({ "content": "soon orphaned", "author": author })),
        ),
    )
    .await;
    let comment = id_of(&body);

    let (status, _) = call(
        &app,
        request(Method::DELETE, &format!("/dreams/{dream}"), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The composed set is still served for the deleted dream's id.
    let (status, body) = call(
        &app,
        request(Method::GET, &format!("/dreams/{dream}/comments"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(id_of(&comments[0]), comment);

    // But the dream-scoped single lookup now reports the missing dream.
    let (status, body) = call(
        &app,
        request(
            Method::GET,
            &format!("/dreams/{dream}/comments/{comment}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["error_description"], "Dream not found");
}

#[tokio::test]
async fn deleting_a_comment_is_unconditional_and_final() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;
    let dream = seed_dream(&app, &cookie, author, topic, kind).await;

    let (_, body) = call(
        &app,
        request(
            Method::POST,
            &format!("/dreams/{dream}/comments"),
            Some(&cookie),
            Some(&json!({ "content": "short lived", "author": author })),
        ),
    )
    .await;
    let comment = id_of(&body);

    let (status, _) = call(
        &app,
        request(
            Method::DELETE,
            &format!("/dreams/{dream}/comments/{comment}"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &app,
        request(
            Method::DELETE,
            &format!("/dreams/{dream}/comments/{comment}"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["error_description"], "Comment not found");
}

//=========================================================================================
// Sessions
//=========================================================================================

#[tokio::test]
async fn login_rejects_bad_passwords() {
    let app = test_app();
    create_account(&app, "rosalind").await;

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(&json!({ "name": "rosalind", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"][0]["error"], "invalid_credentials");
}

#[tokio::test]
async fn writes_require_a_session_cookie() {
    let app = test_app();

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/topics",
            None,
            Some(&json!({ "name": "water", "color": "#00f" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"][0]["error"], "invalid_token");
}

#[tokio::test]
async fn me_follows_the_session_until_logout() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;

    let (status, body) = call(
        &app,
        request(Method::GET, "/auth/me", Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], json!(author));
    assert_eq!(body["user"]["name"], "rosalind");
    assert!(body["user"].get("password").is_none());

    let (status, _) = call(
        &app,
        request(Method::POST, "/auth/logout", Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The revoked cookie no longer opens the door.
    let (status, _) = call(
        &app,
        request(Method::GET, "/auth/me", Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

//=========================================================================================
// Users
//=========================================================================================

#[tokio::test]
async fn duplicate_names_and_short_passwords_are_rejected() {
    let app = test_app();
    create_account(&app, "rosalind").await;

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/users",
            None,
            Some(&json!({ "name": "rosalind", "password": "short" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["error"], "name_taken");
    assert_eq!(errors[0]["error_description"], "Name already exists");
    assert_eq!(errors[1]["error"], "too_short");
    assert_eq!(errors[1]["error_description"], "Password is too small");
}

#[tokio::test]
async fn single_user_read_embeds_the_dreams() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;
    let (topic, kind) = seed_catalog(&app, &cookie).await;
    let dream = seed_dream(&app, &cookie, author, topic, kind).await;

    let (status, body) = call(
        &app,
        request(Method::GET, &format!("/users/{author}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let dreams = body["user"]["dreams"].as_array().unwrap();
    assert_eq!(dreams.len(), 1);
    assert_eq!(id_of(&dreams[0]), dream);

    // The list endpoint does not embed dreams.
    let (_, body) = call(&app, request(Method::GET, "/users", None, None)).await;
    assert!(body["users"][0].get("dreams").is_none());
}

#[tokio::test]
async fn user_patch_updates_fields_and_password() {
    let app = test_app();
    let (cookie, author) = seed_session(&app).await;

    let (status, _) = call(
        &app,
        request(
            Method::PATCH,
            &format!("/users/{author}"),
            Some(&cookie),
            Some(&json!({ "description": "chronic lucid dreamer", "password": "a-new-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(
        &app,
        request(Method::GET, &format!("/users/{author}"), None, None),
    )
    .await;
    assert_eq!(body["user"]["description"], "chronic lucid dreamer");
    assert_eq!(body["user"]["name"], "rosalind");

    // The old password is dead, the new one works.
    let (status, _) = call(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(&json!({ "name": "rosalind", "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(&json!({ "name": "rosalind", "password": "a-new-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

//=========================================================================================
// Topics, Types, Reactions
//=========================================================================================

#[tokio::test]
async fn topic_put_validates_then_replaces_wholesale() {
    let app = test_app();
    let (cookie, _) = seed_session(&app).await;
    let (topic, _) = seed_catalog(&app, &cookie).await;

    let (status, body) = call(
        &app,
        request(
            Method::PUT,
            &format!("/topics/{topic}"),
            Some(&cookie),
            Some(&json!({ "name": "water", "color": "teal" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["error"], "invalid_format");
    assert_eq!(body["errors"][0]["error_description"], "Invalid color");

    let (status, _) = call(
        &app,
        request(
            Method::PUT,
            &format!("/topics/{topic}"),
            Some(&cookie),
            Some(&json!({ "name": "water", "color": "#008080" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(
        &app,
        request(Method::GET, &format!("/topics/{topic}"), None, None),
    )
    .await;
    assert_eq!(body["topic"]["name"], "water");
    assert_eq!(body["topic"]["color"], "#008080");
}

#[tokio::test]
async fn reaction_patch_is_partial() {
    let app = test_app();
    let (cookie, _) = seed_session(&app).await;

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/reactions",
            Some(&cookie),
            Some(&json!({ "name": "wow", "icon": "😮" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reaction = id_of(&body);

    let (status, _) = call(
        &app,
        request(
            Method::PATCH,
            &format!("/reactions/{reaction}"),
            Some(&cookie),
            Some(&json!({ "icon": "🤯" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, request(Method::GET, "/reactions", None, None)).await;
    assert_eq!(body["reactions"][0]["name"], "wow");
    assert_eq!(body["reactions"][0]["icon"], "🤯");
}

#[tokio::test]
async fn type_envelope_uses_the_type_key() {
    let app = test_app();
    let (cookie, _) = seed_session(&app).await;
    let (_, kind) = seed_catalog(&app, &cookie).await;

    let (status, body) = call(
        &app,
        request(Method::GET, &format!("/types/{kind}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"]["name"], "lucid");
}

#[tokio::test]
async fn list_endpoints_honor_skip_and_limit() {
    let app = test_app();
    let (cookie, _) = seed_session(&app).await;

    for name in ["alpha", "beta", "gamma"] {
        let (status, _) = call(
            &app,
            request(
                Method::POST,
                "/topics",
                Some(&cookie),
                Some(&json!({ "name": name, "color": "#123456" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(
        &app,
        request(Method::GET, "/topics?skip=1&limit=1", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0]["name"], "beta");
}

#[tokio::test]
async fn negative_paging_values_clamp_to_zero() {
    let app = test_app();
    let (cookie, _) = seed_session(&app).await;

    for name in ["alpha", "beta"] {
        let (status, _) = call(
            &app,
            request(
                Method::POST,
                "/topics",
                Some(&cookie),
                Some(&json!({ "name": name, "color": "#123456" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // skip=-1 reads as skip=0: the full first page, not an error.
    let (status, body) = call(
        &app,
        request(Method::GET, "/topics?skip=-1", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["name"], "alpha");

    // limit=-1 reads as limit=0: an empty page.
    let (status, body) = call(
        &app,
        request(Method::GET, "/topics?limit=-1", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"].as_array().unwrap().len(), 0);
}
