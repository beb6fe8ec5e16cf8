//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! returns the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for development; restrict in production deployments.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static segments before parameterized ones, so /sets/bulk, /sets/user
    // and /sets/session never collide with /sets/{id}.
    let sets = Router::new()
        .route("/", post(handlers::create_set))
        .route("/bulk", post(handlers::bulk_create_sets))
        .route("/user/{user_id}", get(handlers::get_sets_by_user))
        .route("/user/{user_id}/stats", get(handlers::get_user_workout_stats))
        .route(
            "/user/{user_id}/exercise/{exercise_id}",
            get(handlers::get_sets_by_exercise),
        )
        .route(
            "/session/{workout_session_id}",
            get(handlers::get_sets_by_session),
        )
        .route(
            "/{id}",
            get(handlers::get_set)
                .put(handlers::update_set)
                .delete(handlers::delete_set),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/sets", sets)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
