pub mod auth;
pub mod comments;
pub mod dream_types;
pub mod dreams;
pub mod middleware;
pub mod reactions;
pub mod rest;
pub mod state;
pub mod topics;
pub mod users;

pub use middleware::require_auth;
pub use rest::ApiDoc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Builds the complete application router.
///
/// Reads and signup are public; every other write runs behind the
/// session-cookie middleware. The binary and the integration tests both
/// build the app through here.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origin.clone())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/users", post(users::create_user_handler))
        .route("/users", get(users::list_users_handler))
        .route("/users/{id}", get(users::get_user_handler))
        .route("/dreams", get(dreams::list_dreams_handler))
        .route("/dreams/{id}", get(dreams::get_dream_handler))
        .route(
            "/dreams/{id}/comments",
            get(comments::list_dream_comments_handler),
        )
        .route(
            "/dreams/{id}/comments/{comment_id}",
            get(comments::get_comment_handler),
        )
        .route("/topics", get(topics::list_topics_handler))
        .route("/topics/{id}", get(topics::get_topic_handler))
        .route("/types", get(dream_types::list_types_handler))
        .route("/types/{id}", get(dream_types::get_type_handler))
        .route("/reactions", get(reactions::list_reactions_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/users/{id}",
            patch(users::update_user_handler).delete(users::delete_user_handler),
        )
        .route("/dreams", post(dreams::create_dream_handler))
        .route(
            "/dreams/{id}",
            patch(dreams::update_dream_handler).delete(dreams::delete_dream_handler),
        )
        .route(
            "/dreams/{id}/comments",
            post(comments::create_comment_handler),
        )
        .route(
            "/dreams/{id}/comments/{comment_id}",
            post(comments::reply_comment_handler)
                .patch(comments::update_comment_handler)
                .delete(comments::delete_comment_handler),
        )
        .route("/topics", post(topics::create_topic_handler))
        .route(
            "/topics/{id}",
            put(topics::update_topic_handler).delete(topics::delete_topic_handler),
        )
        .route("/types", post(dream_types::create_type_handler))
        .route(
            "/types/{id}",
            put(dream_types::update_type_handler).delete(dream_types::delete_type_handler),
        )
        .route("/reactions", post(reactions::create_reaction_handler))
        .route(
            "/reactions/{id}",
            patch(reactions::update_reaction_handler).delete(reactions::delete_reaction_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
