use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::favorites::handlers;
use crate::features::favorites::services::FavoriteService;

/// Create routes for the favorites feature
///
/// All routes require authentication (applied by caller)
pub fn routes(service: Arc<FavoriteService>) -> Router {
    Router::new()
        .route(
            "/api/favorites",
            get(handlers::list_favorites).post(handlers::add_favorite),
        )
        .route(
            "/api/favorites/{service_id}",
            delete(handlers::remove_favorite),
        )
        .with_state(service)
}
