use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::services::handlers::{self, ServiceState};

/// Public service discovery routes. The caller layers optional
/// authentication so viewer identity is available when a token is sent.
pub fn public_routes(state: ServiceState) -> Router {
    Router::new()
        .route("/api/services", get(handlers::list_services))
        .route("/api/services/recommended", get(handlers::recommended_services))
        .route("/api/services/{id}", get(handlers::get_service))
        .with_state(state)
}

/// Protected service routes (require auth middleware to be applied by caller)
pub fn protected_routes(state: ServiceState) -> Router {
    Router::new()
        .route("/api/services", post(handlers::create_service))
        .route("/api/services/my", get(handlers::my_services))
        .route("/api/services/similar/{id}", get(handlers::similar_services))
        .route(
            "/api/services/{id}",
            put(handlers::update_service).delete(handlers::delete_service),
        )
        .with_state(state)
}
