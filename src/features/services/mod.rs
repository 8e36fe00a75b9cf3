pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use handlers::ServiceState;
pub use services::{
    RecommendationService, SearchHistoryService, ServiceCatalogService, SimilarityService,
};
