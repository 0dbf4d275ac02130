//! API Routes
//!
//! Configures the Axum router with all demo service endpoints.

use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    evict_all_handler, evict_user_handler, get_user_handler, get_users_handler, health_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /users/:id` - Resolve a user, loading through the cache
/// - `GET /users?ids=1,2,3` - Resolve a batch of users
/// - `DELETE /users/:id` - Evict a user from the cache
/// - `DELETE /users` - Evict every cached user
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/users", get(get_users_handler).delete(evict_all_handler))
        .route(
            "/users/:id",
            get(get_user_handler).delete(evict_user_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
