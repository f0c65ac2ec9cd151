use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::AppState;
use super::handlers;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route("/topmovies/:user_id", get(handlers::top_movies))
        .route("/recommend", post(handlers::recommend))
        // Reviews
        .route(
            "/review",
            get(handlers::get_reviews).post(handlers::create_review),
        )
        // GET takes a user id, DELETE a review id
        .route(
            "/review/:id",
            get(handlers::get_user_reviews).delete(handlers::delete_review),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
